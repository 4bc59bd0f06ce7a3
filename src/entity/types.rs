//! Entity declaration types. Deserializable from a JSON manifest or built in
//! code with the declaration-style builder on [`EntityDescriptor`].

use crate::case::to_snake_case;
use crate::entity::behavior::Behavior;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    String,
    Decimal,
    Boolean,
    Timestamp,
    /// Structured value stored as a JSON document.
    Array,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnDefault {
    Expression { expression: String },
    Literal(Value),
}

impl<'de> Deserialize<'de> for ColumnDefault {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        match v {
            Value::Object(mut obj) if obj.contains_key("expression") => match obj.remove("expression") {
                Some(Value::String(expression)) => Ok(ColumnDefault::Expression { expression }),
                _ => Err(serde::de::Error::custom(
                    "column default expression must be a string",
                )),
            },
            other => Ok(ColumnDefault::Literal(other)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnOptions {
    #[serde(default)]
    pub unsigned: bool,
    #[serde(default)]
    pub notnull: bool,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub autoincrement: bool,
    /// Not null and not whitespace-only.
    #[serde(default)]
    pub notblank: bool,
    #[serde(default)]
    pub default: Option<ColumnDefault>,
    /// Digits after the decimal point, for decimal columns.
    #[serde(default)]
    pub scale: Option<u32>,
}

impl ColumnOptions {
    pub fn new() -> Self {
        ColumnOptions::default()
    }

    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    pub fn notnull(mut self) -> Self {
        self.notnull = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    pub fn notblank(mut self) -> Self {
        self.notblank = true;
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(ColumnDefault::Literal(default.into()));
        self
    }

    pub fn default_expression(mut self, expression: impl Into<String>) -> Self {
        self.default = Some(ColumnDefault::Expression {
            expression: expression.into(),
        });
        self
    }

    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: ColumnType,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub options: ColumnOptions,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, type_: ColumnType, length: Option<u32>, options: ColumnOptions) -> Self {
        ColumnDef {
            name: name.into(),
            type_,
            length,
            options,
        }
    }

    /// A value must be supplied: notblank, or notnull with nothing to fill it in.
    pub fn is_required(&self) -> bool {
        self.options.notblank
            || (self.options.notnull && self.options.default.is_none() && !self.options.autoincrement)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    HasOne,
    HasMany,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    pub fn as_sql(self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

/// Link to another model. For `HasOne` the foreign key lives on this entity
/// (`local` references `model.foreign`); for `HasMany` it lives on the target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDef {
    pub kind: RelationKind,
    pub model: String,
    pub local: String,
    pub foreign: String,
    #[serde(default)]
    pub on_delete: ReferentialAction,
    #[serde(default)]
    pub on_update: ReferentialAction,
}

impl RelationDef {
    pub fn has_one(model: impl Into<String>, local: impl Into<String>, foreign: impl Into<String>) -> Self {
        RelationDef {
            kind: RelationKind::HasOne,
            model: model.into(),
            local: local.into(),
            foreign: foreign.into(),
            on_delete: ReferentialAction::NoAction,
            on_update: ReferentialAction::NoAction,
        }
    }

    pub fn has_many(model: impl Into<String>, local: impl Into<String>, foreign: impl Into<String>) -> Self {
        RelationDef {
            kind: RelationKind::HasMany,
            ..RelationDef::has_one(model, local, foreign)
        }
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = action;
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = action;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub name: String,
    /// Defaults to the snake-cased model name.
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub relations: Vec<RelationDef>,
    #[serde(default)]
    pub behaviors: Vec<Behavior>,
}

impl EntityDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        EntityDescriptor {
            name: name.into(),
            table: None,
            columns: Vec::new(),
            relations: Vec::new(),
            behaviors: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn table_name(&self) -> String {
        self.table
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| to_snake_case(&self.name))
    }

    /// Declare a column. A `length` of 0 means unsized.
    pub fn has_column(mut self, name: &str, type_: ColumnType, length: u32, options: ColumnOptions) -> Self {
        let length = (length > 0).then_some(length);
        self.columns.push(ColumnDef::new(name, type_, length, options));
        self
    }

    pub fn has_one(mut self, relation: RelationDef) -> Self {
        self.relations.push(RelationDef {
            kind: RelationKind::HasOne,
            ..relation
        });
        self
    }

    pub fn has_many(mut self, relation: RelationDef) -> Self {
        self.relations.push(RelationDef {
            kind: RelationKind::HasMany,
            ..relation
        });
        self
    }

    /// Attach a behavior; attaching the same one twice has no effect.
    pub fn act_as(mut self, behavior: Behavior) -> Self {
        if !self.behaviors.contains(&behavior) {
            self.behaviors.push(behavior);
        }
        self
    }

    /// Declared columns followed by behavior columns not already declared.
    pub fn all_columns(&self) -> Vec<ColumnDef> {
        let mut columns = self.columns.clone();
        for behavior in &self.behaviors {
            for column in behavior.columns() {
                if !columns.iter().any(|c| c.name == column.name) {
                    columns.push(column);
                }
            }
        }
        columns
    }

    pub fn column(&self, name: &str) -> Option<ColumnDef> {
        self.all_columns().into_iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> Vec<&ColumnDef> {
        self.columns.iter().filter(|c| c.options.primary).collect()
    }
}
