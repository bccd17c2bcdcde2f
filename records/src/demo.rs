//! Fixed placeholder datasets shown while the backend is unreachable.

use crate::{Article, ArticleSale, Client, Maintenance, Order, Sale, SaleLine, Technician};

fn text(value: &str) -> Option<String> {
    Some(value.to_owned())
}

fn article(id: i64, nombre: &str, descripcion: &str, precio: f64, stock: i64, fecha: &str) -> Article {
    Article {
        id_articulo: id,
        nombre: nombre.to_owned(),
        descripcion: text(descripcion),
        precio,
        stock: Some(stock),
        disponibilidad: text(if stock > 0 { "disponible" } else { "no disponible" }),
        existencia: None,
        fecha_creacion: text(fecha),
    }
}

pub(crate) fn articles() -> Vec<Article> {
    vec![
        article(1, "Filtro de Aceite", "Filtro de aceite para motor diesel", 25.50, 50, "2024-01-10"),
        article(2, "Aceite Motor 5W-30", "Aceite sintético para motor", 99.75, 30, "2024-01-12"),
        article(3, "Juego de Llaves Mixtas", "Juego de llaves de 8 a 19 mm", 89.99, 15, "2024-01-15"),
        article(4, "Bujías Iridium", "Bujías de alto rendimiento", 12.99, 0, "2024-01-18"),
        article(5, "Pastillas de Freno", "Pastillas de freno cerámicas", 45.25, 20, "2024-01-20"),
    ]
}

/// Sales listed under an article when its history cannot be fetched.
#[must_use]
pub fn article_sales() -> Vec<ArticleSale> {
    vec![
        ArticleSale { venta_numero: 1, cantidad: 2, fecha_venta: text("2024-01-15"), total: Some(51.00) },
        ArticleSale { venta_numero: 2, cantidad: 1, fecha_venta: text("2024-01-18"), total: Some(25.50) },
    ]
}

pub(crate) fn clients() -> Vec<Client> {
    let client = |id, nombre: &str, apellido: &str, correo: &str, telefono: &str, direccion: &str| Client {
        id_cliente: id,
        nombre: nombre.to_owned(),
        apellido: apellido.to_owned(),
        correo: text(correo),
        telefono: (!telefono.is_empty()).then(|| telefono.to_owned()),
        direccion: (!direccion.is_empty()).then(|| direccion.to_owned()),
    };
    vec![
        client(1, "Juan", "Pérez", "juan@email.com", "123456789", "Calle Principal 123"),
        client(2, "María", "Gómez", "maria@email.com", "987654321", "Avenida Central 456"),
        client(3, "Carlos", "López", "carlos@email.com", "", ""),
    ]
}

pub(crate) fn sales() -> Vec<Sale> {
    let line = |id_articulo, nombre: &str, cantidad, precio| SaleLine {
        id_articulo,
        nombre: text(nombre),
        cantidad,
        precio,
    };
    vec![
        Sale {
            venta_numero: 1,
            descripcion: text("Venta de repuestos varios"),
            total: Some(150.75),
            fecha_creacion: text("2024-01-15"),
            consecutivo_orden: None,
            articulos: vec![line(1, "Filtro de aire", 2, 25.50), line(2, "Aceite motor", 1, 99.75)],
        },
        Sale {
            venta_numero: 2,
            descripcion: text("Venta de herramientas"),
            total: Some(89.99),
            fecha_creacion: text("2024-01-16"),
            consecutivo_orden: None,
            articulos: vec![line(3, "Juego de llaves", 1, 89.99)],
        },
        Sale {
            venta_numero: 3,
            descripcion: text("Venta de lubricantes"),
            total: Some(45.50),
            fecha_creacion: text("2024-01-17"),
            consecutivo_orden: None,
            articulos: vec![line(4, "Grasa multipropósito", 3, 15.17)],
        },
    ]
}

pub(crate) fn orders() -> Vec<Order> {
    let order = |consecutivo, descripcion: &str, estado: &str, tipo: &str, fecha: &str| Order {
        consecutivo,
        descripcion: text(descripcion),
        estado: text(estado),
        tipo_orden: text(tipo),
        id_cliente: None,
        fecha_creacion: text(fecha),
    };
    vec![
        order(1, "Orden de venta de repuestos", "completada", "solo Ventas", "2024-01-15"),
        order(2, "Mantenimiento preventivo equipo A", "en_proceso", "solo Mantenimientos", "2024-01-16"),
        order(3, "Venta con instalación incluida", "pendiente", "Mantenimiento con ventas", "2024-01-17"),
    ]
}

pub(crate) fn maintenance() -> Vec<Maintenance> {
    let job = |numero, descripcion: &str, tipo: &str, fecha: &str| Maintenance {
        mto_numero: numero,
        descripcion: descripcion.to_owned(),
        tipo_mto: tipo.to_owned(),
        precio: None,
        consecutivo_orden: None,
        fecha_creacion: text(fecha),
    };
    vec![
        job(1, "Mantenimiento preventivo mensual", "Preventivo", "2024-01-15"),
        job(2, "Reparación de motor principal", "Correctivo", "2024-01-10"),
        job(3, "Cambio de filtros y lubricantes", "Preventivo", "2024-01-05"),
    ]
}

pub(crate) fn technicians() -> Vec<Technician> {
    let tech = |id, nombre: &str, apellido: &str, especialidad: &str, telefono: &str, email: &str| Technician {
        id_tecnico: id,
        nombre: nombre.to_owned(),
        apellido: apellido.to_owned(),
        especialidad: especialidad.to_owned(),
        telefono: text(telefono),
        email: text(email),
    };
    vec![
        tech(1, "Carlos", "Rodríguez", "Mecánica Industrial", "+1 234-567-8901", "carlos.rodriguez@empresa.com"),
        tech(2, "Ana", "Martínez", "Electricidad", "+1 234-567-8902", "ana.martinez@empresa.com"),
        tech(3, "Luis", "García", "Electrónica", "+1 234-567-8903", "luis.garcia@empresa.com"),
        tech(4, "María", "López", "Sistemas Hidráulicos", "+1 234-567-8904", "maria.lopez@empresa.com"),
    ]
}
