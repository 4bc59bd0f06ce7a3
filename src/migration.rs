//! PostgreSQL DDL for registered entities: tables first, then foreign keys.

use crate::entity::{
    ColumnDef, ColumnDefault, ColumnType, EntityDescriptor, EntityRegistry, RelationKind,
};
use crate::error::{AppError, ConfigError};
use serde_json::Value;
use sqlx::PgPool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn type_str(c: &ColumnDef) -> String {
    match c.type_ {
        ColumnType::Integer => {
            let wide = c.length.map(|l| l > 4).unwrap_or(true);
            match (wide, c.options.autoincrement) {
                (false, false) => "INTEGER".into(),
                (false, true) => "SERIAL".into(),
                (true, false) => "BIGINT".into(),
                (true, true) => "BIGSERIAL".into(),
            }
        }
        ColumnType::String => match c.length {
            Some(n) => format!("VARCHAR({})", n),
            None => "TEXT".into(),
        },
        ColumnType::Decimal => match c.length {
            Some(p) => format!("NUMERIC({}, {})", p, c.options.scale.unwrap_or(0)),
            None => "NUMERIC".into(),
        },
        ColumnType::Boolean => "BOOLEAN".into(),
        ColumnType::Timestamp => "TIMESTAMPTZ".into(),
        ColumnType::Array => "JSONB".into(),
    }
}

fn default_str(c: &ColumnDef, default: &ColumnDefault) -> String {
    match default {
        ColumnDefault::Expression { expression } => expression.clone(),
        ColumnDefault::Literal(v) => match v {
            Value::Null => "NULL".into(),
            Value::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => literal(s),
            structured if c.type_ == ColumnType::Array => format!("{}::jsonb", literal(&structured.to_string())),
            other => literal(&other.to_string()),
        },
    }
}

fn column_ddl(c: &ColumnDef) -> String {
    let name = quote(&c.name);
    let mut def = format!("{} {}", name, type_str(c));
    if c.options.notnull || c.options.notblank || c.options.primary {
        def.push_str(" NOT NULL");
    }
    if let Some(d) = &c.options.default {
        def.push_str(" DEFAULT ");
        def.push_str(&default_str(c, d));
    }
    if c.options.unsigned && matches!(c.type_, ColumnType::Integer | ColumnType::Decimal) {
        def.push_str(&format!(" CHECK ({} >= 0)", name));
    }
    if c.options.notblank && c.type_ == ColumnType::String {
        def.push_str(&format!(" CHECK (btrim({}) <> '')", name));
    }
    def
}

/// `CREATE TABLE IF NOT EXISTS` for one entity, behavior columns included.
pub fn table_ddl(entity: &EntityDescriptor) -> String {
    let mut defs: Vec<String> = entity.all_columns().iter().map(column_ddl).collect();
    let pk: Vec<String> = entity.primary_key().iter().map(|c| quote(&c.name)).collect();
    if !pk.is_empty() {
        defs.push(format!("PRIMARY KEY ({})", pk.join(", ")));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quote(&entity.table_name()),
        defs.join(",\n  ")
    )
}

/// One `ALTER TABLE ... ADD CONSTRAINT` per has-one relation of `entity`.
pub fn foreign_key_ddl(entity: &EntityDescriptor, registry: &EntityRegistry) -> Result<Vec<String>, ConfigError> {
    let table = entity.table_name();
    entity
        .relations
        .iter()
        .filter(|r| r.kind == RelationKind::HasOne)
        .map(|r| {
            let target = registry.get(&r.model).ok_or_else(|| ConfigError::MissingReference {
                kind: "model",
                id: r.model.clone(),
            })?;
            Ok(format!(
                "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON UPDATE {} ON DELETE {}",
                quote(&table),
                quote(&format!("fk_{}_{}", table, r.local)),
                quote(&r.local),
                quote(&target.table_name()),
                quote(&r.foreign),
                r.on_update.as_sql(),
                r.on_delete.as_sql()
            ))
        })
        .collect()
}

/// Every statement [`apply_migrations`] would run, in order.
pub fn migration_script(registry: &EntityRegistry) -> Result<Vec<String>, ConfigError> {
    registry.validate()?;
    let mut statements: Vec<String> = registry.iter().map(table_ddl).collect();
    for entity in registry.iter() {
        statements.extend(foreign_key_ddl(entity, registry)?);
    }
    Ok(statements)
}

/// Validate the registry, create every table, then add foreign keys. Tables
/// use `IF NOT EXISTS`; a foreign key that already exists is logged and skipped.
pub async fn apply_migrations(pool: &PgPool, registry: &EntityRegistry) -> Result<(), AppError> {
    registry.validate()?;

    for entity in registry.iter() {
        sqlx::query(&table_ddl(entity)).execute(pool).await?;
        tracing::info!(entity = %entity.name, table = %entity.table_name(), "table ensured");
    }

    for entity in registry.iter() {
        for sql in foreign_key_ddl(entity, registry)? {
            if let Err(e) = sqlx::query(&sql).execute(pool).await {
                tracing::warn!(entity = %entity.name, error = %e, "foreign key not added");
            }
        }
    }

    Ok(())
}
