//! Validator factory: listener order, dispatch and session lifetime
//!
//! Each change is routed through a fixed dispatch table. An entry names a
//! validator and the change tags it applies to; the factory builds the
//! validator for the change, runs it and drops it. Session scoped validators
//! are built over the factory's [`SessionState`], so their memory survives
//! the validator instance and lasts exactly as long as the factory.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::{
    AddUniqueValidator, ChangeFilter, ChangeSetValidator, ChangeValidator, CheckSumValidator,
    ColumnConstraintsValidator, ColumnsValidator, CopyColumnValidator, CreateIndexValidator,
    DropColumnValidator, ExpectedPath, DuplicatedIdValidator, DuplicatedIndexValidator, FilePathValidator,
    FilterChangesValidator, InsertColumnsValidator, InsertDataValidator, IssueIdValidator,
    LengthRangeValidator, Limits, LowerCaseValidator, NewDataTypeValidator,
    NotNullConstraintValidator, NotPermittedValidator, OracleClobValidator,
    OracleModifyDataTypeValidator, ReplaceViewValidator, SequenceValidator, SessionState,
    TableSizeValidator, TenantIdNotNullValidator, TypedValueValidator, ValidationIssue,
    ValidatorConfig,
};
use crate::error::LintError;
use crate::model::{ChangeLog, ChangeRef, ChangeSetRef, ChangeTag as T};
use crate::rules::Equals;
use crate::state::{default_listeners, notify, ChangeListener, SchemaStore};

const SEQUENCE_ALTERATION_ATTRIBUTES: &[&str] = &["startValue", "incrementBy"];
const BASE_TABLE_LOCATION_ATTRIBUTES: &[&str] = &["baseTableCatalogName", "baseTableSchemaName"];
const SEQUENCE_NAME_ATTRIBUTES: &[&str] = &["sequenceName"];

/// How long a validator's memory lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Nothing is remembered between changes
    PerCall,
    /// Memory is kept in the factory's session state
    Session,
}

/// Change tags a dispatch entry applies to
#[derive(Debug, Clone, Copy)]
enum Applies {
    Always,
    /// The tag or any tag specializing it
    IsA(&'static [T]),
    Exactly(T),
}

impl Applies {
    fn matches(self, tag: T) -> bool {
        match self {
            Applies::Always => true,
            Applies::IsA(tags) => tags.iter().any(|other| tag.is_a(*other)),
            Applies::Exactly(other) => tag == other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeCheck {
    FilterChanges,
    NonPortable,
    LowerCase,
    OracleLength,
    Columns,
    OracleClob,
    TenantIdNotNull,
    NotNullConstraint,
    TableSize,
    TypedValue,
    SequenceAlteration,
    BaseTableLocation,
    Sql99Datatype,
    OracleModifyDataType,
    NumericType,
    LobType,
    ColumnConstraints,
    DuplicatedIndex,
    CreateIndex,
    SequenceName,
    Sequence,
    DropColumn,
    CopyColumn,
    InsertData,
    InsertColumns,
    AddUnique,
    ReplaceView,
}

impl ChangeCheck {
    fn name(self) -> &'static str {
        match self {
            ChangeCheck::FilterChanges => "filterChanges",
            ChangeCheck::NonPortable
            | ChangeCheck::SequenceAlteration
            | ChangeCheck::BaseTableLocation => "notPermitted",
            ChangeCheck::LowerCase => "lowerCase",
            ChangeCheck::OracleLength => "oracleLength",
            ChangeCheck::Columns => "columns",
            ChangeCheck::OracleClob => "oracleCLOB",
            ChangeCheck::TenantIdNotNull => "tenantIdNotNull",
            ChangeCheck::NotNullConstraint => "notNullConstraint",
            ChangeCheck::TableSize => "tableSize",
            ChangeCheck::TypedValue => "value",
            ChangeCheck::Sql99Datatype => "sql99Datatype",
            ChangeCheck::OracleModifyDataType => "oracleModifyDataType",
            ChangeCheck::NumericType => "numericType",
            ChangeCheck::LobType => "lobType",
            ChangeCheck::ColumnConstraints => "columnConstraints",
            ChangeCheck::DuplicatedIndex => "duplicatedIndex",
            ChangeCheck::CreateIndex => "createIndex",
            ChangeCheck::SequenceName => "range",
            ChangeCheck::Sequence => "sequence",
            ChangeCheck::DropColumn => "dropColumnChange",
            ChangeCheck::CopyColumn => "copyColumn",
            ChangeCheck::InsertData => "insertDataChange",
            ChangeCheck::InsertColumns => "insertColumnsChange",
            ChangeCheck::AddUnique => "addUnique",
            ChangeCheck::ReplaceView => "replaceView",
        }
    }

    fn scope(self) -> Scope {
        match self {
            ChangeCheck::DuplicatedIndex | ChangeCheck::InsertData => Scope::Session,
            _ => Scope::PerCall,
        }
    }
}

/// Change validators in execution order
const CHANGE_DISPATCH: &[(ChangeCheck, Applies)] = &[
    (ChangeCheck::FilterChanges, Applies::Always),
    (ChangeCheck::NonPortable, Applies::Always),
    (ChangeCheck::LowerCase, Applies::Always),
    (ChangeCheck::OracleLength, Applies::Always),
    (
        ChangeCheck::Columns,
        Applies::IsA(&[T::AddColumn, T::CreateTable, T::CreateIndex, T::DropColumn]),
    ),
    (
        ChangeCheck::OracleClob,
        Applies::IsA(&[T::AddColumn, T::CreateTable, T::ResizeDataType]),
    ),
    (ChangeCheck::TenantIdNotNull, Applies::IsA(&[T::AddColumn, T::CreateTable])),
    (
        ChangeCheck::NotNullConstraint,
        Applies::IsA(&[T::AddColumn, T::AddNotNullConstraint]),
    ),
    (
        ChangeCheck::TableSize,
        Applies::IsA(&[T::AddColumn, T::CreateTable, T::ModifyDataType]),
    ),
    (
        ChangeCheck::TypedValue,
        Applies::IsA(&[T::AddColumn, T::CreateTable, T::InsertData]),
    ),
    (ChangeCheck::SequenceAlteration, Applies::IsA(&[T::AlterSequence])),
    (
        ChangeCheck::BaseTableLocation,
        Applies::IsA(&[T::DropAllForeignKeyConstraints]),
    ),
    (ChangeCheck::Sql99Datatype, Applies::IsA(&[T::ModifyDataType])),
    (ChangeCheck::OracleModifyDataType, Applies::Exactly(T::ModifyDataType)),
    (ChangeCheck::NumericType, Applies::IsA(&[T::ModifyDataType])),
    (ChangeCheck::LobType, Applies::IsA(&[T::ModifyDataType])),
    (
        ChangeCheck::ColumnConstraints,
        Applies::IsA(&[T::ModifyDataType, T::RenameColumn]),
    ),
    (ChangeCheck::DuplicatedIndex, Applies::IsA(&[T::CreateIndex, T::DropIndex])),
    (ChangeCheck::CreateIndex, Applies::IsA(&[T::CreateIndex])),
    (ChangeCheck::SequenceName, Applies::IsA(&[T::CreateSequence])),
    (ChangeCheck::Sequence, Applies::IsA(&[T::CreateSequence])),
    (ChangeCheck::DropColumn, Applies::IsA(&[T::DropColumn])),
    (ChangeCheck::CopyColumn, Applies::IsA(&[T::CopyColumn])),
    (ChangeCheck::InsertData, Applies::IsA(&[T::InsertData])),
    (ChangeCheck::InsertColumns, Applies::IsA(&[T::InsertData])),
    (ChangeCheck::AddUnique, Applies::IsA(&[T::AddUniqueConstraint])),
    (ChangeCheck::ReplaceView, Applies::IsA(&[T::CreateView])),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeSetCheck {
    FilePath,
    DuplicatedId,
    CheckSum,
}

impl ChangeSetCheck {
    fn name(self) -> &'static str {
        match self {
            ChangeSetCheck::FilePath => "filePath",
            ChangeSetCheck::DuplicatedId => "duplicatedId",
            ChangeSetCheck::CheckSum => "checksum",
        }
    }

    fn scope(self) -> Scope {
        match self {
            ChangeSetCheck::FilePath | ChangeSetCheck::DuplicatedId => Scope::Session,
            ChangeSetCheck::CheckSum => Scope::PerCall,
        }
    }
}

/// Change set validators in execution order, after any registered extras
const CHANGE_SET_DISPATCH: &[ChangeSetCheck] = &[
    ChangeSetCheck::FilePath,
    ChangeSetCheck::DuplicatedId,
    ChangeSetCheck::CheckSum,
];

/// Configuration resolved once, when the factory is created
#[derive(Debug)]
struct Settings {
    filter: ChangeFilter,
    limits: Limits,
    expected_path: Option<ExpectedPath>,
    typed_values: bool,
    ignore: HashSet<String>,
    skip_change_sets: HashSet<String>,
}

impl Settings {
    fn is_ignored(&self, name: &str) -> bool {
        self.ignore.contains(name)
    }
}

fn build_change_validator<'s>(
    check: ChangeCheck,
    settings: &'s Settings,
    session: &'s mut SessionState,
) -> Result<Option<Box<dyn ChangeValidator + 's>>, LintError> {
    let limits = &settings.limits;
    let validator: Box<dyn ChangeValidator + 's> = match check {
        ChangeCheck::FilterChanges => Box::new(FilterChangesValidator::new(&settings.filter)),
        ChangeCheck::NonPortable => Box::new(NotPermittedValidator::non_portable()),
        ChangeCheck::LowerCase => Box::new(LowerCaseValidator::default()),
        ChangeCheck::OracleLength => {
            Box::new(LengthRangeValidator::oracle(limits.oracle_identifier_length))
        }
        ChangeCheck::Columns => Box::new(ColumnsValidator::new(
            limits.min_name_length,
            limits.max_name_length,
            limits.column_max_precision,
        )),
        ChangeCheck::OracleClob => Box::new(OracleClobValidator::new(limits.oracle_varchar_length)),
        ChangeCheck::TenantIdNotNull => Box::new(TenantIdNotNullValidator),
        ChangeCheck::NotNullConstraint => Box::new(NotNullConstraintValidator),
        ChangeCheck::TableSize => Box::new(TableSizeValidator::new(limits.row_size_limit)),
        ChangeCheck::TypedValue if settings.typed_values => Box::new(TypedValueValidator),
        ChangeCheck::TypedValue => return Ok(None),
        ChangeCheck::SequenceAlteration => {
            Box::new(NotPermittedValidator::new(SEQUENCE_ALTERATION_ATTRIBUTES))
        }
        ChangeCheck::BaseTableLocation => {
            Box::new(NotPermittedValidator::new(BASE_TABLE_LOCATION_ATTRIBUTES))
        }
        ChangeCheck::Sql99Datatype => Box::new(NewDataTypeValidator::sql99()),
        ChangeCheck::OracleModifyDataType => Box::new(OracleModifyDataTypeValidator),
        ChangeCheck::NumericType => {
            Box::new(NewDataTypeValidator::numeric(limits.numeric_max_precision))
        }
        ChangeCheck::LobType => Box::new(NewDataTypeValidator::lob()),
        ChangeCheck::ColumnConstraints => Box::new(ColumnConstraintsValidator),
        ChangeCheck::DuplicatedIndex => Box::new(DuplicatedIndexValidator::new(&mut session.indexes)),
        ChangeCheck::CreateIndex => Box::new(CreateIndexValidator::new(limits.index_key_limit)),
        ChangeCheck::SequenceName => Box::new(LengthRangeValidator::new(
            "range",
            1,
            limits.sequence_name_max_length,
            SEQUENCE_NAME_ATTRIBUTES,
        )),
        ChangeCheck::Sequence => Box::new(SequenceValidator::new(&limits.sequence_step)?),
        ChangeCheck::DropColumn => Box::new(DropColumnValidator),
        ChangeCheck::CopyColumn => Box::new(CopyColumnValidator),
        ChangeCheck::InsertData => Box::new(InsertDataValidator::new(&mut session.insert_owners)),
        ChangeCheck::InsertColumns => Box::new(InsertColumnsValidator),
        ChangeCheck::AddUnique => Box::new(AddUniqueValidator),
        ChangeCheck::ReplaceView => Box::new(ReplaceViewValidator),
    };
    Ok(Some(validator))
}

fn build_change_set_validator<'s>(
    check: ChangeSetCheck,
    settings: &'s Settings,
    session: &'s mut SessionState,
) -> Option<Box<dyn ChangeSetValidator + 's>> {
    match check {
        ChangeSetCheck::FilePath => {
            let expected = settings.expected_path.as_ref()?;
            Some(Box::new(FilePathValidator::new(
                expected,
                &mut session.checked_files,
            )))
        }
        ChangeSetCheck::DuplicatedId => Some(Box::new(DuplicatedIdValidator::new(
            &mut session.change_set_ids,
        ))),
        ChangeSetCheck::CheckSum => Some(Box::new(CheckSumValidator)),
    }
}

/// Runs listeners and validators over changes, owning one validation session
pub struct ValidatorFactory {
    settings: Settings,
    store: SchemaStore,
    listeners: Vec<Box<dyn ChangeListener>>,
    session: SessionState,
    extra_change_validators: Vec<Box<dyn ChangeValidator>>,
    extra_change_set_validators: Vec<Box<dyn ChangeSetValidator>>,
}

impl ValidatorFactory {
    /// Create a factory, failing fast on any configuration error
    pub fn new(config: &ValidatorConfig) -> Result<Self, LintError> {
        let filter = ChangeFilter::new(&config.include_changes, &config.exclude_changes)?;
        let limits = config.limits.clone().with_parameters(&config.parameters)?;
        Equals::new(&limits.sequence_step)?;

        let mut extra_change_set_validators: Vec<Box<dyn ChangeSetValidator>> = Vec::new();
        let issue_pattern = config
            .issue_pattern
            .as_deref()
            .filter(|pattern| !pattern.trim().is_empty());
        if let Some(pattern) = issue_pattern {
            extra_change_set_validators.push(Box::new(IssueIdValidator::new(pattern)?));
        }

        let expected_path = match (&config.artifact_id, &config.source_dir) {
            (Some(artifact), _) => Some(ExpectedPath::Artifact(artifact.clone())),
            (None, Some(root)) => Some(ExpectedPath::SourceDir {
                root: root.clone(),
                suffix: limits.file_path_suffix.clone(),
            }),
            (None, None) => None,
        };

        info!(
            ignored = config.ignore_rules.len(),
            typed_values = config.typed_values,
            "created validation session"
        );
        Ok(Self {
            settings: Settings {
                filter,
                limits,
                expected_path,
                typed_values: config.typed_values,
                ignore: config.ignore_rules.iter().cloned().collect(),
                skip_change_sets: config.skip_change_sets.iter().cloned().collect(),
            },
            store: SchemaStore::new(),
            listeners: default_listeners(),
            session: SessionState::new(),
            extra_change_validators: Vec::new(),
            extra_change_set_validators,
        })
    }

    /// Add a change validator that runs for every change, before the dispatch table
    pub fn register_change_validator(&mut self, validator: Box<dyn ChangeValidator>) {
        self.extra_change_validators.push(validator);
    }

    /// Add a change set validator that runs for every change set, before the dispatch table
    pub fn register_change_set_validator(&mut self, validator: Box<dyn ChangeSetValidator>) {
        self.extra_change_set_validators.push(validator);
    }

    /// Scope of a dispatched validator, by name
    pub fn scope(name: &str) -> Option<Scope> {
        CHANGE_DISPATCH
            .iter()
            .map(|(check, _)| (check.name(), check.scope()))
            .chain(CHANGE_SET_DISPATCH.iter().map(|check| (check.name(), check.scope())))
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, scope)| scope)
    }

    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Run the change set validators once for a change set
    pub fn validate_change_set(
        &mut self,
        change_set: ChangeSetRef<'_>,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let mut issues = Vec::new();
        for validator in &mut self.extra_change_set_validators {
            if self.settings.is_ignored(validator.name()) {
                continue;
            }
            issues.extend(validator.validate(change_set)?);
        }
        for check in CHANGE_SET_DISPATCH {
            if self.settings.is_ignored(check.name()) {
                continue;
            }
            let Some(mut validator) =
                build_change_set_validator(*check, &self.settings, &mut self.session)
            else {
                continue;
            };
            issues.extend(validator.validate(change_set)?);
        }
        Ok(issues)
    }

    /// Replay a change onto the store, then run every applicable validator
    pub fn validate_change(&mut self, change: ChangeRef<'_>) -> Result<Vec<ValidationIssue>, LintError> {
        notify(&self.listeners, change.change, &mut self.store)?;

        let mut issues = Vec::new();
        for validator in &mut self.extra_change_validators {
            if self.settings.is_ignored(validator.name()) {
                continue;
            }
            issues.extend(validator.validate(change, &self.store)?);
        }

        let tag = change.change.tag();
        for (check, applies) in CHANGE_DISPATCH {
            if !applies.matches(tag) || self.settings.is_ignored(check.name()) {
                continue;
            }
            let Some(mut validator) =
                build_change_validator(*check, &self.settings, &mut self.session)?
            else {
                continue;
            };
            debug!(
                validator = validator.name(),
                scope = ?check.scope(),
                change = change.element_name(),
                "running validator"
            );
            issues.extend(validator.validate(change, &self.store)?);
        }
        Ok(issues)
    }

    /// Validate every change set of a changelog, in order
    pub fn validate_change_log(
        &mut self,
        change_log: &ChangeLog,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let mut issues = Vec::new();
        for change_set in change_log.change_set_refs() {
            if self.settings.skip_change_sets.contains(change_set.id()) {
                if change_set.change_set.is_db_specific() {
                    info!(id = change_set.id(), "skipping change set");
                    continue;
                }
                warn!(
                    id = change_set.id(),
                    "change set cannot be skipped because it is not DB specific"
                );
            }
            issues.extend(self.validate_change_set(change_set)?);
            for change in change_set.changes() {
                issues.extend(self.validate_change(change)?);
            }
        }
        info!(
            file = %change_log.physical_file_path,
            issues = issues.len(),
            "validated changelog"
        );
        Ok(issues)
    }
}
