//! Records written on first start so a fresh store is usable right away.

use chrono::NaiveDate;

use crate::domain::{Category, MonthKey, Movement, MovementKind, Role, User};

/// Categories created for every seeded user, as `(id prefix, name, kind, color)`.
const DEFAULT_CATEGORIES: [(&str, &str, MovementKind, &str); 12] = [
    ("c1", "Salario", MovementKind::Income, "#10b981"),
    ("c2", "Freelance", MovementKind::Income, "#3b82f6"),
    ("c3", "Alimentacion", MovementKind::Expense, "#f59e0b"),
    ("c4", "Transporte", MovementKind::Expense, "#ef4444"),
    ("c5", "Entretenimiento", MovementKind::Expense, "#8b5cf6"),
    ("c6", "Servicios", MovementKind::Expense, "#06b6d4"),
    ("c11", "Salud", MovementKind::Expense, "#ef4444"),
    ("c12", "Salud", MovementKind::Income, "#10b981"),
    ("c13", "Vivienda", MovementKind::Expense, "#f59e0b"),
    ("c14", "Vivienda", MovementKind::Income, "#06b6d4"),
    ("c15", "Ahorro", MovementKind::Expense, "#8b5cf6"),
    ("c16", "Ahorro", MovementKind::Income, "#3b82f6"),
];

pub fn default_users() -> Vec<User> {
    vec![
        User::new("Juan Pérez", "juan@example.com", "123456", Role::User).with_id("u1"),
        User::new("María García", "maria@example.com", "123456", Role::User).with_id("u2"),
        User::new("Carlos López", "carlos@example.com", "123456", Role::User).with_id("u3"),
        User::new("Administrador", "admin@example.com", "admin123", Role::Admin).with_id("admin"),
    ]
}

pub fn default_categories(users: &[User]) -> Vec<Category> {
    users
        .iter()
        .flat_map(|user| {
            DEFAULT_CATEGORIES
                .iter()
                .map(move |(prefix, name, kind, color)| {
                    Category::new(*name, *kind)
                        .with_id(format!("{}-{}", prefix, user.id))
                        .owned_by(user.id.clone())
                        .with_color(*color)
                })
        })
        .collect()
}

pub fn sample_movements(today: NaiveDate) -> Vec<Movement> {
    let month = MonthKey::of(today);
    let sample = |id: &str, kind, description: &str, amount, category: &str, day| Movement {
        id: id.into(),
        user_id: "u1".into(),
        kind,
        description: description.into(),
        amount,
        category_id: category.into(),
        date: month.day(day),
    };
    vec![
        sample("m1", MovementKind::Income, "Salario Enero", 3500.0, "c1-u1", 1),
        sample("m2", MovementKind::Income, "Proyecto Freelance", 800.0, "c2-u1", 5),
        sample("m3", MovementKind::Expense, "Supermercado", 250.0, "c3-u1", 3),
    ]
}
