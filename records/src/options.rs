//! Option lists offered by the dashboard's record forms.

/// Kinds of maintenance job.
pub const MAINTENANCE_KINDS: [&str; 4] = ["Preventivo", "Correctivo", "Predictivo", "Urgente"];

/// Kinds of work order.
pub const ORDER_KINDS: [&str; 5] = ["Instalación", "Reparación", "Mantenimiento", "Revisión", "Emergencia"];

/// Lifecycle states shared by orders and maintenance jobs.
pub const STATES: [&str; 4] = ["Pendiente", "En Proceso", "Completado", "Cancelado"];

/// Technician specialities.
pub const TECHNICIAN_SPECIALITIES: [&str; 5] = ["Electrónica", "Informática", "Mecánica", "Electricidad", "General"];

/// Priority levels.
pub const PRIORITIES: [&str; 4] = ["Baja", "Media", "Alta", "Urgente"];

/// Whether `value` is one of `options`, compared case-insensitively.
#[must_use]
pub fn is_listed(options: &[&str], value: &str) -> bool {
    options.iter().any(|option| option.eq_ignore_ascii_case(value.trim()))
}
