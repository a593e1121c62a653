//! Change records: one variant per schema mutation

use serde::Deserialize;

use super::lenient::opt_scalar;

/// A schema change operation as produced by the changelog parser.
///
/// Serialized with an internal `change` tag carrying the element name,
/// e.g. `{"change": "addColumn", "tableName": "t1", "columns": [...]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "change", rename_all = "camelCase")]
pub enum Change {
    CreateTable(CreateTableChange),
    AddColumn(AddColumnChange),
    DropColumn(DropColumnChange),
    RenameColumn(RenameColumnChange),
    RenameTable(RenameTableChange),
    DropTable(DropTableChange),
    ModifyDataType(ModifyDataTypeChange),
    /// Same shape as `modifyDataType`, restricted to length changes
    ResizeDataType(ModifyDataTypeChange),
    AddNotNullConstraint(AddNotNullConstraintChange),
    DropNotNullConstraint(DropNotNullConstraintChange),
    AddUniqueConstraint(AddUniqueConstraintChange),
    DropUniqueConstraint(DropUniqueConstraintChange),
    AddPrimaryKey(AddPrimaryKeyChange),
    DropPrimaryKey(DropPrimaryKeyChange),
    AddForeignKeyConstraint(AddForeignKeyConstraintChange),
    DropForeignKeyConstraint(DropForeignKeyConstraintChange),
    DropAllForeignKeyConstraints(DropAllForeignKeyConstraintsChange),
    CreateIndex(CreateIndexChange),
    DropIndex(DropIndexChange),
    CreateSequence(CreateSequenceChange),
    AlterSequence(AlterSequenceChange),
    RenameSequence(RenameSequenceChange),
    DropSequence(DropSequenceChange),
    #[serde(rename = "insert")]
    InsertData(InsertDataChange),
    CreateView(CreateViewChange),
    DropView(DropViewChange),
    CopyColumn(CopyColumnChange),
    Sql(SqlChange),
}

/// Variant tag of a [`Change`], used for validator dispatch and change filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChangeTag {
    CreateTable,
    AddColumn,
    DropColumn,
    RenameColumn,
    RenameTable,
    DropTable,
    ModifyDataType,
    ResizeDataType,
    AddNotNullConstraint,
    DropNotNullConstraint,
    AddUniqueConstraint,
    DropUniqueConstraint,
    AddPrimaryKey,
    DropPrimaryKey,
    AddForeignKeyConstraint,
    DropForeignKeyConstraint,
    DropAllForeignKeyConstraints,
    CreateIndex,
    DropIndex,
    CreateSequence,
    AlterSequence,
    RenameSequence,
    DropSequence,
    InsertData,
    CreateView,
    DropView,
    CopyColumn,
    Sql,
}

impl ChangeTag {
    pub const ALL: [ChangeTag; 28] = [
        ChangeTag::CreateTable,
        ChangeTag::AddColumn,
        ChangeTag::DropColumn,
        ChangeTag::RenameColumn,
        ChangeTag::RenameTable,
        ChangeTag::DropTable,
        ChangeTag::ModifyDataType,
        ChangeTag::ResizeDataType,
        ChangeTag::AddNotNullConstraint,
        ChangeTag::DropNotNullConstraint,
        ChangeTag::AddUniqueConstraint,
        ChangeTag::DropUniqueConstraint,
        ChangeTag::AddPrimaryKey,
        ChangeTag::DropPrimaryKey,
        ChangeTag::AddForeignKeyConstraint,
        ChangeTag::DropForeignKeyConstraint,
        ChangeTag::DropAllForeignKeyConstraints,
        ChangeTag::CreateIndex,
        ChangeTag::DropIndex,
        ChangeTag::CreateSequence,
        ChangeTag::AlterSequence,
        ChangeTag::RenameSequence,
        ChangeTag::DropSequence,
        ChangeTag::InsertData,
        ChangeTag::CreateView,
        ChangeTag::DropView,
        ChangeTag::CopyColumn,
        ChangeTag::Sql,
    ];

    /// Changelog element name (e.g. `addColumn`)
    pub fn element_name(self) -> &'static str {
        match self {
            ChangeTag::CreateTable => "createTable",
            ChangeTag::AddColumn => "addColumn",
            ChangeTag::DropColumn => "dropColumn",
            ChangeTag::RenameColumn => "renameColumn",
            ChangeTag::RenameTable => "renameTable",
            ChangeTag::DropTable => "dropTable",
            ChangeTag::ModifyDataType => "modifyDataType",
            ChangeTag::ResizeDataType => "resizeDataType",
            ChangeTag::AddNotNullConstraint => "addNotNullConstraint",
            ChangeTag::DropNotNullConstraint => "dropNotNullConstraint",
            ChangeTag::AddUniqueConstraint => "addUniqueConstraint",
            ChangeTag::DropUniqueConstraint => "dropUniqueConstraint",
            ChangeTag::AddPrimaryKey => "addPrimaryKey",
            ChangeTag::DropPrimaryKey => "dropPrimaryKey",
            ChangeTag::AddForeignKeyConstraint => "addForeignKeyConstraint",
            ChangeTag::DropForeignKeyConstraint => "dropForeignKeyConstraint",
            ChangeTag::DropAllForeignKeyConstraints => "dropAllForeignKeyConstraints",
            ChangeTag::CreateIndex => "createIndex",
            ChangeTag::DropIndex => "dropIndex",
            ChangeTag::CreateSequence => "createSequence",
            ChangeTag::AlterSequence => "alterSequence",
            ChangeTag::RenameSequence => "renameSequence",
            ChangeTag::DropSequence => "dropSequence",
            ChangeTag::InsertData => "insert",
            ChangeTag::CreateView => "createView",
            ChangeTag::DropView => "dropView",
            ChangeTag::CopyColumn => "copyColumn",
            ChangeTag::Sql => "sql",
        }
    }

    /// Resolve a changelog element name back to its tag
    pub fn from_element_name(name: &str) -> Option<ChangeTag> {
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.element_name() == name)
    }

    /// The tag this one specializes, if any
    pub fn parent(self) -> Option<ChangeTag> {
        match self {
            ChangeTag::ResizeDataType => Some(ChangeTag::ModifyDataType),
            _ => None,
        }
    }

    /// True when `self` is `other` or specializes it
    pub fn is_a(self, other: ChangeTag) -> bool {
        std::iter::successors(Some(self), |t| t.parent()).any(|t| t == other)
    }
}

impl Change {
    pub fn tag(&self) -> ChangeTag {
        match self {
            Change::CreateTable(_) => ChangeTag::CreateTable,
            Change::AddColumn(_) => ChangeTag::AddColumn,
            Change::DropColumn(_) => ChangeTag::DropColumn,
            Change::RenameColumn(_) => ChangeTag::RenameColumn,
            Change::RenameTable(_) => ChangeTag::RenameTable,
            Change::DropTable(_) => ChangeTag::DropTable,
            Change::ModifyDataType(_) => ChangeTag::ModifyDataType,
            Change::ResizeDataType(_) => ChangeTag::ResizeDataType,
            Change::AddNotNullConstraint(_) => ChangeTag::AddNotNullConstraint,
            Change::DropNotNullConstraint(_) => ChangeTag::DropNotNullConstraint,
            Change::AddUniqueConstraint(_) => ChangeTag::AddUniqueConstraint,
            Change::DropUniqueConstraint(_) => ChangeTag::DropUniqueConstraint,
            Change::AddPrimaryKey(_) => ChangeTag::AddPrimaryKey,
            Change::DropPrimaryKey(_) => ChangeTag::DropPrimaryKey,
            Change::AddForeignKeyConstraint(_) => ChangeTag::AddForeignKeyConstraint,
            Change::DropForeignKeyConstraint(_) => ChangeTag::DropForeignKeyConstraint,
            Change::DropAllForeignKeyConstraints(_) => ChangeTag::DropAllForeignKeyConstraints,
            Change::CreateIndex(_) => ChangeTag::CreateIndex,
            Change::DropIndex(_) => ChangeTag::DropIndex,
            Change::CreateSequence(_) => ChangeTag::CreateSequence,
            Change::AlterSequence(_) => ChangeTag::AlterSequence,
            Change::RenameSequence(_) => ChangeTag::RenameSequence,
            Change::DropSequence(_) => ChangeTag::DropSequence,
            Change::InsertData(_) => ChangeTag::InsertData,
            Change::CreateView(_) => ChangeTag::CreateView,
            Change::DropView(_) => ChangeTag::DropView,
            Change::CopyColumn(_) => ChangeTag::CopyColumn,
            Change::Sql(_) => ChangeTag::Sql,
        }
    }

    /// Element name used when attributing issues to this change
    pub fn element_name(&self) -> &'static str {
        self.tag().element_name()
    }

    /// True when this change is, or specializes, the given tag
    pub fn is_a(&self, tag: ChangeTag) -> bool {
        self.tag().is_a(tag)
    }

    /// Table this change operates on (the base table for foreign key changes)
    pub fn table_name(&self) -> Option<&str> {
        let name = match self {
            Change::CreateTable(c) => &c.table_name,
            Change::AddColumn(c) => &c.table_name,
            Change::DropColumn(c) => &c.table_name,
            Change::RenameColumn(c) => &c.table_name,
            Change::RenameTable(c) => &c.new_table_name,
            Change::DropTable(c) => &c.table_name,
            Change::ModifyDataType(c) | Change::ResizeDataType(c) => &c.table_name,
            Change::AddNotNullConstraint(c) => &c.table_name,
            Change::DropNotNullConstraint(c) => &c.table_name,
            Change::AddUniqueConstraint(c) => &c.table_name,
            Change::DropUniqueConstraint(c) => &c.table_name,
            Change::AddPrimaryKey(c) => &c.table_name,
            Change::DropPrimaryKey(c) => &c.table_name,
            Change::AddForeignKeyConstraint(c) => &c.base_table_name,
            Change::DropForeignKeyConstraint(c) => &c.base_table_name,
            Change::DropAllForeignKeyConstraints(c) => &c.base_table_name,
            Change::CreateIndex(c) => &c.table_name,
            Change::DropIndex(c) => &c.table_name,
            Change::InsertData(c) => &c.table_name,
            Change::CopyColumn(c) => &c.table_name,
            Change::CreateSequence(_)
            | Change::AlterSequence(_)
            | Change::RenameSequence(_)
            | Change::DropSequence(_)
            | Change::CreateView(_)
            | Change::DropView(_)
            | Change::Sql(_) => return None,
        };
        name.as_deref()
    }

    /// Nested column declarations, if this change type carries any
    pub fn columns(&self) -> Option<&[ColumnConfig]> {
        match self {
            Change::CreateTable(c) => Some(&c.columns),
            Change::AddColumn(c) => Some(&c.columns),
            Change::DropColumn(c) => Some(&c.columns),
            Change::CreateIndex(c) => Some(&c.columns),
            Change::InsertData(c) => Some(&c.columns),
            _ => None,
        }
    }
}

/// Column declaration nested inside table, index and insert changes
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnConfig {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub data_type: Option<String>,
    pub computed: Option<bool>,
    pub value: Option<String>,
    #[serde(deserialize_with = "opt_scalar")]
    pub value_numeric: Option<String>,
    pub value_date: Option<String>,
    #[serde(deserialize_with = "opt_scalar")]
    pub value_boolean: Option<String>,
    pub value_blob_file: Option<String>,
    pub value_clob_file: Option<String>,
    pub value_computed: Option<String>,
    pub default_value: Option<String>,
    #[serde(deserialize_with = "opt_scalar")]
    pub default_value_numeric: Option<String>,
    pub default_value_date: Option<String>,
    #[serde(deserialize_with = "opt_scalar")]
    pub default_value_boolean: Option<String>,
    pub default_value_computed: Option<String>,
    pub remarks: Option<String>,
    pub constraints: Option<ConstraintsConfig>,
}

impl ColumnConfig {
    /// True when any default value attribute is set
    pub fn has_default_value(&self) -> bool {
        self.default_value.is_some()
            || self.default_value_numeric.is_some()
            || self.default_value_date.is_some()
            || self.default_value_boolean.is_some()
            || self.default_value_computed.is_some()
    }

    /// True when any insert value attribute is set
    pub fn has_value(&self) -> bool {
        self.value.is_some()
            || self.value_numeric.is_some()
            || self.value_boolean.is_some()
            || self.value_date.is_some()
            || self.value_clob_file.is_some()
            || self.value_blob_file.is_some()
    }

    /// Nullable unless an inline constraint says otherwise
    pub fn is_nullable(&self) -> bool {
        self.constraints
            .as_ref()
            .and_then(|c| c.nullable)
            .unwrap_or(true)
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// Inline constraint declaration of a column
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstraintsConfig {
    pub nullable: Option<bool>,
    pub not_null_constraint_name: Option<String>,
    pub primary_key: Option<bool>,
    pub primary_key_name: Option<String>,
    pub primary_key_tablespace: Option<String>,
    pub unique: Option<bool>,
    pub unique_constraint_name: Option<String>,
    pub references: Option<String>,
    pub referenced_table_catalog_name: Option<String>,
    pub referenced_table_schema_name: Option<String>,
    pub referenced_table_name: Option<String>,
    pub referenced_column_names: Option<String>,
    pub foreign_key_name: Option<String>,
    pub delete_cascade: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTableChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub tablespace: Option<String>,
    pub remarks: Option<String>,
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddColumnChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropColumnChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub column_name: Option<String>,
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenameColumnChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub old_column_name: Option<String>,
    pub new_column_name: Option<String>,
    pub column_data_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenameTableChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub old_table_name: Option<String>,
    pub new_table_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropTableChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub cascade_constraints: Option<bool>,
}

/// Shared by `modifyDataType` and `resizeDataType`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModifyDataTypeChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub column_name: Option<String>,
    pub new_data_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddNotNullConstraintChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub column_name: Option<String>,
    pub default_null_value: Option<String>,
    pub column_data_type: Option<String>,
    pub constraint_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropNotNullConstraintChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub column_name: Option<String>,
    pub column_data_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddUniqueConstraintChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub column_names: Option<String>,
    pub constraint_name: Option<String>,
    pub tablespace: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropUniqueConstraintChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub constraint_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddPrimaryKeyChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub column_names: Option<String>,
    pub constraint_name: Option<String>,
    pub tablespace: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropPrimaryKeyChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub constraint_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddForeignKeyConstraintChange {
    pub base_table_catalog_name: Option<String>,
    pub base_table_schema_name: Option<String>,
    pub base_table_name: Option<String>,
    pub base_column_names: Option<String>,
    pub referenced_table_catalog_name: Option<String>,
    pub referenced_table_schema_name: Option<String>,
    pub referenced_table_name: Option<String>,
    pub referenced_column_names: Option<String>,
    pub constraint_name: Option<String>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropForeignKeyConstraintChange {
    pub base_table_catalog_name: Option<String>,
    pub base_table_schema_name: Option<String>,
    pub base_table_name: Option<String>,
    pub constraint_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropAllForeignKeyConstraintsChange {
    pub base_table_catalog_name: Option<String>,
    pub base_table_schema_name: Option<String>,
    pub base_table_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateIndexChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub index_name: Option<String>,
    pub unique: Option<bool>,
    pub tablespace: Option<String>,
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropIndexChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub index_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateSequenceChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub sequence_name: Option<String>,
    #[serde(deserialize_with = "opt_scalar")]
    pub start_value: Option<String>,
    #[serde(deserialize_with = "opt_scalar")]
    pub increment_by: Option<String>,
    #[serde(deserialize_with = "opt_scalar")]
    pub min_value: Option<String>,
    #[serde(deserialize_with = "opt_scalar")]
    pub max_value: Option<String>,
    pub cycle: Option<bool>,
    pub ordered: Option<bool>,
    #[serde(deserialize_with = "opt_scalar")]
    pub cache_size: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlterSequenceChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub sequence_name: Option<String>,
    #[serde(deserialize_with = "opt_scalar")]
    pub increment_by: Option<String>,
    #[serde(deserialize_with = "opt_scalar")]
    pub min_value: Option<String>,
    #[serde(deserialize_with = "opt_scalar")]
    pub max_value: Option<String>,
    pub ordered: Option<bool>,
    #[serde(deserialize_with = "opt_scalar")]
    pub cache_size: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenameSequenceChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub old_sequence_name: Option<String>,
    pub new_sequence_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropSequenceChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub sequence_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsertDataChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub dbms: Option<String>,
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateViewChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub view_name: Option<String>,
    pub select_query: Option<String>,
    pub replace_if_exists: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropViewChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub view_name: Option<String>,
}

/// Copies data between two columns of the same table, converting types
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CopyColumnChange {
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub from_column_name: Option<String>,
    pub from_type: Option<String>,
    pub to_column_name: Option<String>,
    pub to_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SqlChange {
    pub sql: Option<String>,
    pub dbms: Option<String>,
    pub split_statements: Option<bool>,
}
