use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use regex::Regex;

use crate::enum_display_fromstr;
use crate::gateway::{
    AssetFilter, ExportFormat, HistoriqueFilter, InterventionFilter,
    InterventionOwner, ReclamationFilter,
};
use crate::models::{
    ActionType, ActorRole, AssetCategory, AssetStatus, InterventionStatus, InterventionType,
    NotificationPriority, NotificationStatus, NotificationType, Priority, ReclamationStatus,
    ReclamationType, UserRole,
};

#[derive(Parser)]
#[command(name = "gactifs")]
#[command(about = "Terminal console for the asset-management backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared output switch of the commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

impl OutputOptions {
    pub fn new(json: bool) -> Self {
        OutputOptions { json }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        /// Account email
        #[arg(value_parser = parse_email)]
        email: String,

        /// Password (read from stdin if omitted)
        #[arg(long)]
        password: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log out and forget the stored session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the logged-in user, role and permissions
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Exchange the session token for a fresh one
    Refresh {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long, value_parser = parse_email)]
        email: String,

        /// Password (read from stdin if omitted)
        #[arg(long)]
        password: Option<String>,

        /// Role: ADMIN, RESPONSABLE, TECHNICIEN
        #[arg(long, value_parser = parse_user_role)]
        role: Option<UserRole>,

        #[arg(long)]
        json: bool,
    },

    /// Password recovery and change
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Assets ("actifs")
    #[command(visible_alias = "a")]
    Assets {
        #[command(subcommand)]
        action: AssetAction,
    },

    /// Asset categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Service directions
    Services {
        #[command(subcommand)]
        action: ServiceAction,
    },

    /// Interventions on assets
    #[command(visible_alias = "i")]
    Interventions {
        #[command(subcommand)]
        action: InterventionAction,
    },

    /// Claims ("réclamations")
    #[command(visible_alias = "r")]
    Reclamations {
        #[command(subcommand)]
        action: ReclamationAction,
    },

    /// Technician directory
    #[command(visible_alias = "t")]
    Technicians {
        #[command(subcommand)]
        action: TechnicianAction,
    },

    /// User accounts
    Users {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Notifications
    Notifications {
        #[command(subcommand)]
        action: NotificationAction,
    },

    /// Claim history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Interactive paginated view with search, selection and bulk actions
    Browse {
        /// Collection to browse
        #[arg(value_parser = parse_browse_target)]
        target: BrowseTarget,

        /// Initial search term
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum PasswordAction {
    /// Change the password of the logged-in account
    Change {
        /// Current password (read from stdin if omitted)
        #[arg(long)]
        current: Option<String>,

        /// New password (read from stdin if omitted)
        #[arg(long)]
        new: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Ask for a reset link by email
    Forgot {
        #[arg(value_parser = parse_email)]
        email: String,

        #[arg(long)]
        json: bool,
    },
    /// Set a new password with a reset token
    Reset {
        /// Token received by email
        token: String,

        /// New password (read from stdin if omitted)
        #[arg(long)]
        new: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Check whether a reset token is still valid
    Check {
        token: String,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (api.base_url, view.page_size, ...)
        key: String,
        /// Value to set
        value: String,

        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,

        #[arg(long)]
        json: bool,
    },
}

/// Local view options shared by every `ls`.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Free-text search over the record's text fields
    #[arg(short, long)]
    pub search: Option<String>,

    /// Exact match on a field, FIELD=VALUE (repeatable)
    #[arg(long = "where", value_name = "FIELD=VALUE", value_parser = parse_field_value)]
    pub equals: Vec<FieldArg>,

    /// Case-insensitive substring match, FIELD=TEXT (repeatable)
    #[arg(long, value_name = "FIELD=TEXT", value_parser = parse_field_value)]
    pub contains: Vec<FieldArg>,

    /// Inclusive date or number range, FIELD=FROM..TO (repeatable)
    #[arg(long, value_name = "FIELD=FROM..TO", value_parser = parse_field_value)]
    pub between: Vec<FieldArg>,

    /// Sort field
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Page to show (1-based)
    #[arg(long, default_value_t = 1, value_parser = parse_page)]
    pub page: usize,

    /// Rows per page (default: view.page_size)
    #[arg(long, value_parser = parse_page)]
    pub page_size: Option<usize>,

    /// Show every matching row instead of one page
    #[arg(long)]
    pub all: bool,

    /// Fetch a single server-side page (1-based) instead of the whole collection
    #[arg(long, value_name = "N", value_parser = parse_page)]
    pub server_page: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// A `FIELD=VALUE` pair given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldArg {
    pub field: String,
    pub value: String,
}

/// Where to write a downloaded export.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Output file (default: a name derived from the collection)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum AssetAction {
    /// List assets
    Ls {
        #[command(flatten)]
        list: ListArgs,

        /// Filter by status
        #[arg(long, value_parser = parse_asset_status)]
        status: Option<AssetStatus>,

        /// Filter by category
        #[arg(long, value_parser = parse_asset_category)]
        category: Option<AssetCategory>,

        /// Only the assets of this service (served by the backend)
        #[arg(long)]
        service: Option<i64>,
    },
    /// Search assets on the backend
    Search {
        /// Free text (`?q=` when no other filter is given)
        text: Option<String>,

        #[command(flatten)]
        filter: AssetFilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display one asset
    Show {
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create an asset
    Create {
        /// Asset name
        name: String,

        #[command(flatten)]
        fields: AssetFields,

        #[arg(long)]
        json: bool,
    },
    /// Update an asset; unset flags keep their value
    Update {
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: AssetFields,

        #[arg(long)]
        json: bool,
    },
    /// Delete an asset
    Delete {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Set the status of several assets
    SetStatus {
        #[arg(value_parser = parse_asset_status)]
        status: AssetStatus,

        #[arg(required = true)]
        ids: Vec<i64>,

        #[arg(long)]
        json: bool,
    },
    /// Delete several assets
    BulkDelete {
        #[arg(required = true)]
        ids: Vec<i64>,

        #[arg(long)]
        json: bool,
    },
    /// Audit trail of one asset
    Trail {
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Asset statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Download a spreadsheet of assets
    Export {
        /// Only these assets (default: all)
        ids: Vec<i64>,

        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct AssetFilterArgs {
    #[arg(long, value_parser = parse_asset_status)]
    pub status: Option<AssetStatus>,

    #[arg(long, value_parser = parse_asset_category)]
    pub category: Option<AssetCategory>,

    #[arg(long)]
    pub service: Option<i64>,

    /// Acquired on or after
    #[arg(long)]
    pub from: Option<String>,

    /// Acquired on or before
    #[arg(long)]
    pub to: Option<String>,

    #[arg(long)]
    pub min_value: Option<f64>,

    #[arg(long)]
    pub max_value: Option<f64>,
}

impl AssetFilterArgs {
    pub fn to_filter(&self, text: Option<String>) -> AssetFilter {
        AssetFilter {
            service_id: self.service,
            status: self.status,
            category: self.category,
            search: text,
            date_from: self.from.clone(),
            date_to: self.to.clone(),
            value_min: self.min_value,
            value_max: self.max_value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_filter(None) == AssetFilter::default()
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct AssetFields {
    #[arg(long)]
    pub reference: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_parser = parse_asset_category)]
    pub category: Option<AssetCategory>,

    #[arg(long, value_parser = parse_asset_status)]
    pub status: Option<AssetStatus>,

    /// Acquisition date (YYYY-MM-DD)
    #[arg(long)]
    pub acquired: Option<String>,

    #[arg(long)]
    pub value: Option<f64>,

    #[arg(long)]
    pub serial: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// Owning service id
    #[arg(long)]
    pub service: Option<i64>,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories
    Ls {
        #[command(flatten)]
        list: ListArgs,

        /// Only active categories (served by the backend)
        #[arg(long)]
        active: bool,
    },
    /// Search categories on the backend
    Search {
        /// Name contains
        #[arg(long)]
        name: Option<String>,

        /// true or false
        #[arg(long, value_parser = parse_bool_strict)]
        active: Option<bool>,

        /// Created on or after
        #[arg(long)]
        from: Option<String>,

        /// Created on or before
        #[arg(long)]
        to: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display one category
    Show {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Create a category
    Create {
        name: String,

        /// Unique code
        code: String,

        #[command(flatten)]
        fields: CategoryFields,

        #[arg(long)]
        json: bool,
    },
    /// Update a category; unset flags keep their value
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        code: Option<String>,

        #[command(flatten)]
        fields: CategoryFields,

        #[arg(long)]
        json: bool,
    },
    /// Delete a category
    Delete {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Flip a category between active and inactive
    Toggle {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Check whether a code is already used
    CheckCode {
        code: String,

        /// Ignore this category (when renaming it)
        #[arg(long)]
        exclude: Option<i64>,

        #[arg(long)]
        json: bool,
    },
    /// Category statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Download a spreadsheet of categories
    Export {
        /// Only these categories (default: all)
        ids: Vec<i64>,

        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CategoryFields {
    #[arg(long)]
    pub description: Option<String>,

    /// Display colour (e.g. #1e88e5)
    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub icon: Option<String>,

    /// true or false
    #[arg(long, value_parser = parse_bool_strict)]
    pub active: Option<bool>,
}

#[derive(Subcommand)]
pub enum ServiceAction {
    /// List service directions
    Ls {
        #[command(flatten)]
        list: ListArgs,

        /// Only active services (served by the backend)
        #[arg(long)]
        active: bool,
    },
    /// Search services on the backend
    Search {
        text: String,

        #[arg(long)]
        json: bool,
    },
    /// Display one service
    Show {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Create a service
    Create {
        name: String,

        #[command(flatten)]
        fields: ServiceFields,

        #[arg(long)]
        json: bool,
    },
    /// Update a service; unset flags keep their value
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: ServiceFields,

        #[arg(long)]
        json: bool,
    },
    /// Delete a service
    Delete {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Flip a service between active and inactive
    Toggle {
        id: i64,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServiceFields {
    #[arg(long)]
    pub code: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Head of the service
    #[arg(long)]
    pub head: Option<String>,

    #[arg(long, value_parser = parse_email)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long, value_parser = parse_bool_strict)]
    pub active: Option<bool>,
}

#[derive(Subcommand)]
pub enum InterventionAction {
    /// List interventions
    Ls {
        #[command(flatten)]
        list: ListArgs,

        #[arg(long, value_parser = parse_intervention_status)]
        status: Option<InterventionStatus>,

        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,

        #[arg(long = "type", value_parser = parse_intervention_type)]
        kind: Option<InterventionType>,

        /// Assigned technician id
        #[arg(long)]
        technician: Option<i64>,
    },
    /// Search interventions on the backend
    Search {
        #[command(flatten)]
        filter: InterventionFilterArgs,

        /// Fetch only this server page (1-based)
        #[arg(long, value_parser = parse_page)]
        server_page: Option<usize>,

        #[arg(long)]
        json: bool,
    },
    /// Display one intervention
    Show {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Create an intervention
    Create {
        title: String,

        #[command(flatten)]
        fields: InterventionFields,

        #[arg(long)]
        json: bool,
    },
    /// Update an intervention; unset flags keep their value
    Update {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: InterventionFields,

        #[arg(long)]
        json: bool,
    },
    /// Delete an intervention
    Delete {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Set the status of an intervention
    Status {
        id: i64,

        #[arg(value_parser = parse_intervention_status)]
        status: InterventionStatus,

        #[arg(long)]
        json: bool,
    },
    /// Start work
    Start {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Mark as done
    Complete {
        id: i64,

        /// Actual duration in hours
        #[arg(long)]
        duration: Option<f64>,

        #[arg(long)]
        json: bool,
    },
    /// Validate completed work
    Validate {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Put on hold
    Suspend {
        id: i64,

        #[arg(long)]
        reason: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Cancel
    Cancel {
        id: i64,

        #[arg(long)]
        reason: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Assign a technician
    Assign {
        id: i64,
        technician: i64,

        #[arg(long)]
        json: bool,
    },
    /// Remove the assigned technician
    Unassign {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Interventions past their due date
    Overdue {
        #[arg(long)]
        json: bool,
    },
    /// Critical interventions
    Critical {
        #[arg(long)]
        json: bool,
    },
    /// Interventions due in the next days
    Upcoming {
        #[arg(long, default_value_t = 7)]
        days: u32,

        #[arg(long)]
        json: bool,
    },
    /// Interventions of one technician, asset or service
    For {
        /// technician, asset or service
        #[arg(value_parser = parse_owner)]
        owner: InterventionOwner,

        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Intervention statistics, optionally for a period
    Stats {
        #[arg(long, requires = "to")]
        from: Option<String>,

        #[arg(long, requires = "from")]
        to: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Download an Excel or PDF report
    Export {
        /// excel or pdf
        #[arg(long, default_value = "excel", value_parser = parse_export_format)]
        format: ExportFormat,

        #[command(flatten)]
        filter: InterventionFilterArgs,

        #[command(flatten)]
        export: ExportArgs,
    },
    /// Set the status of several interventions
    BulkStatus {
        #[arg(value_parser = parse_intervention_status)]
        status: InterventionStatus,

        #[arg(required = true)]
        ids: Vec<i64>,

        #[arg(long)]
        json: bool,
    },
    /// Assign several interventions to one technician
    BulkAssign {
        technician: i64,

        #[arg(required = true)]
        ids: Vec<i64>,

        #[arg(long)]
        json: bool,
    },
    /// Delete several interventions
    BulkDelete {
        #[arg(required = true)]
        ids: Vec<i64>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct InterventionFilterArgs {
    /// Title contains
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long = "type", value_parser = parse_intervention_type)]
    pub kind: Option<InterventionType>,

    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<Priority>,

    #[arg(long, value_parser = parse_intervention_status)]
    pub status: Option<InterventionStatus>,

    #[arg(long)]
    pub technician: Option<i64>,

    #[arg(long)]
    pub service: Option<i64>,

    #[arg(long)]
    pub asset: Option<i64>,

    /// Started on or after
    #[arg(long)]
    pub started_after: Option<String>,

    /// Started on or before
    #[arg(long)]
    pub started_before: Option<String>,

    /// Due on or after
    #[arg(long)]
    pub due_after: Option<String>,

    /// Due on or before
    #[arg(long)]
    pub due_before: Option<String>,
}

impl From<&InterventionFilterArgs> for InterventionFilter {
    fn from(args: &InterventionFilterArgs) -> Self {
        InterventionFilter {
            titre: args.title.clone(),
            type_intervention: args.kind,
            priorite: args.priority,
            statut: args.status,
            technicien_id: args.technician,
            service_id: args.service,
            asset_id: args.asset,
            date_debut_min: args.started_after.clone(),
            date_debut_max: args.started_before.clone(),
            date_echeance_min: args.due_after.clone(),
            date_echeance_max: args.due_before.clone(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct InterventionFields {
    #[arg(long)]
    pub description: Option<String>,

    #[arg(long = "type", value_parser = parse_intervention_type)]
    pub kind: Option<InterventionType>,

    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<Priority>,

    #[arg(long, value_parser = parse_intervention_status)]
    pub status: Option<InterventionStatus>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    /// Estimated duration in hours
    #[arg(long)]
    pub estimate: Option<f64>,

    #[arg(long)]
    pub cost: Option<f64>,

    #[arg(long)]
    pub asset: Option<i64>,

    #[arg(long)]
    pub technician: Option<i64>,

    #[arg(long)]
    pub service: Option<i64>,
}

#[derive(Subcommand)]
pub enum ReclamationAction {
    /// List claims
    Ls {
        #[command(flatten)]
        list: ListArgs,

        #[arg(long, value_parser = parse_reclamation_status)]
        status: Option<ReclamationStatus>,

        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,

        #[arg(long = "type", value_parser = parse_reclamation_type)]
        kind: Option<ReclamationType>,
    },
    /// Search claims on the backend
    Search {
        #[command(flatten)]
        filter: ReclamationFilterArgs,

        /// Fetch only this server page (1-based)
        #[arg(long, value_parser = parse_page)]
        server_page: Option<usize>,

        #[arg(long)]
        json: bool,
    },
    /// Display one claim
    Show {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// File a claim
    Create {
        /// Subject
        subject: String,

        #[command(flatten)]
        fields: ReclamationFields,

        #[arg(long)]
        json: bool,
    },
    /// Update a claim; unset flags keep their value
    Update {
        id: i64,

        #[arg(long)]
        subject: Option<String>,

        #[command(flatten)]
        fields: ReclamationFields,

        #[arg(long)]
        json: bool,
    },
    /// Delete a claim
    Delete {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Set the status of a claim
    Status {
        id: i64,

        #[arg(value_parser = parse_reclamation_status)]
        status: ReclamationStatus,

        #[arg(long)]
        json: bool,
    },
    /// Assign a technician
    Assign {
        id: i64,
        technician: i64,

        #[arg(long)]
        json: bool,
    },
    /// Record the resolution
    Resolve {
        id: i64,

        /// What was done
        resolution: String,

        #[arg(long)]
        cost: Option<f64>,

        #[arg(long)]
        json: bool,
    },
    /// Close with the claimant's satisfaction score
    Close {
        id: i64,

        /// 1 to 5
        #[arg(value_parser = parse_satisfaction)]
        satisfaction: u8,

        #[arg(long)]
        json: bool,
    },
    /// Show the discussion thread of a claim
    Comments {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Add a comment to a claim
    Comment {
        id: i64,

        /// Comment text
        text: String,

        #[arg(long)]
        json: bool,
    },
    /// Claims past their due date
    Overdue {
        #[arg(long)]
        json: bool,
    },
    /// Claim statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Download an Excel or PDF report
    Export {
        #[arg(long, default_value = "excel", value_parser = parse_export_format)]
        format: ExportFormat,

        #[command(flatten)]
        filter: ReclamationFilterArgs,

        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ReclamationFilterArgs {
    /// Subject contains
    #[arg(long)]
    pub subject: Option<String>,

    #[arg(long, value_parser = parse_reclamation_status)]
    pub status: Option<ReclamationStatus>,

    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<Priority>,

    #[arg(long = "type", value_parser = parse_reclamation_type)]
    pub kind: Option<ReclamationType>,

    #[arg(long, value_parser = parse_email)]
    pub claimant_email: Option<String>,

    #[arg(long)]
    pub technician: Option<i64>,

    #[arg(long)]
    pub service: Option<i64>,

    /// Created on or after
    #[arg(long)]
    pub from: Option<String>,

    /// Created on or before
    #[arg(long)]
    pub to: Option<String>,
}

impl From<&ReclamationFilterArgs> for ReclamationFilter {
    fn from(args: &ReclamationFilterArgs) -> Self {
        ReclamationFilter {
            objet: args.subject.clone(),
            statut: args.status,
            priorite: args.priority,
            type_reclamation: args.kind,
            reclamant_email: args.claimant_email.clone(),
            technicien_id: args.technician,
            service_id: args.service,
            date_creation_debut: args.from.clone(),
            date_creation_fin: args.to.clone(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ReclamationFields {
    #[arg(long)]
    pub description: Option<String>,

    #[arg(long = "type", value_parser = parse_reclamation_type)]
    pub kind: Option<ReclamationType>,

    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<Priority>,

    #[arg(long, value_parser = parse_reclamation_status)]
    pub status: Option<ReclamationStatus>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    #[arg(long)]
    pub claimant_name: Option<String>,

    #[arg(long, value_parser = parse_email)]
    pub claimant_email: Option<String>,

    #[arg(long)]
    pub claimant_phone: Option<String>,

    #[arg(long)]
    pub service: Option<i64>,

    #[arg(long)]
    pub asset: Option<i64>,
}

#[derive(Subcommand)]
pub enum TechnicianAction {
    /// List technicians
    Ls {
        #[command(flatten)]
        list: ListArgs,

        /// Only technicians taking assignments (served by the backend)
        #[arg(long)]
        active: bool,
    },
    /// Search technicians on the backend
    Search {
        text: String,

        #[arg(long)]
        json: bool,
    },
    /// Display one technician
    Show {
        id: i64,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// List users
    Ls {
        #[command(flatten)]
        list: ListArgs,

        /// Only this role (served by the backend)
        #[arg(long, value_parser = parse_user_role)]
        role: Option<UserRole>,

        /// Only active accounts (served by the backend)
        #[arg(long, conflicts_with = "role")]
        active: bool,
    },
    /// Search users on the backend
    Search {
        text: String,

        #[arg(long)]
        json: bool,
    },
    /// Display one user
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },
    /// Create a user
    Create {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long, value_parser = parse_email)]
        email: String,

        #[arg(long, value_parser = parse_user_role)]
        role: UserRole,

        /// Initial password (read from stdin if omitted)
        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Update a user; unset flags keep their value
    Update {
        id: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long, value_parser = parse_email)]
        email: Option<String>,

        #[arg(long, value_parser = parse_user_role)]
        role: Option<UserRole>,

        #[arg(long)]
        json: bool,
    },
    /// Delete a user
    Delete {
        id: String,

        #[arg(long)]
        json: bool,
    },
    /// Re-enable an account
    Activate {
        id: String,

        #[arg(long)]
        json: bool,
    },
    /// Disable an account
    Deactivate {
        id: String,

        #[arg(long)]
        json: bool,
    },
    /// Change a user's password
    Passwd {
        id: String,

        /// Current password (read from stdin if omitted)
        #[arg(long)]
        current: Option<String>,

        /// New password (read from stdin if omitted)
        #[arg(long)]
        new: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Generate a temporary password
    ResetPassword {
        id: String,

        #[arg(long)]
        json: bool,
    },
    /// User statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum NotificationAction {
    /// List notifications
    Ls {
        #[command(flatten)]
        list: ListArgs,

        /// Notifications of this user (served by the backend)
        #[arg(long)]
        user: Option<i64>,

        /// With --user: only this status
        #[arg(long, requires = "user", value_parser = parse_notification_status)]
        status: Option<NotificationStatus>,

        /// Only unread
        #[arg(long, conflicts_with = "status")]
        unread: bool,
    },
    /// Mark one notification as read
    Read {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Mark every notification of a user as read
    ReadAll {
        user: i64,

        #[arg(long)]
        json: bool,
    },
    /// Archive a notification
    Archive {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Delete a notification
    Delete {
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// Send a notification to a user
    Send {
        /// Recipient user id
        user: i64,

        title: String,

        message: String,

        #[arg(long = "type", default_value = "INFO", value_parser = parse_notification_type)]
        kind: NotificationType,

        #[arg(long, default_value = "NORMALE", value_parser = parse_notification_priority)]
        priority: NotificationPriority,

        /// Related claim
        #[arg(long)]
        reclamation: Option<i64>,

        #[arg(long)]
        json: bool,
    },
    /// Notification counters
    Stats {
        /// Only this user's
        #[arg(long)]
        user: Option<i64>,

        #[arg(long)]
        json: bool,
    },
    /// Follow new notifications as they arrive
    Watch,
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List history entries
    Ls {
        #[command(flatten)]
        list: ListArgs,

        #[command(flatten)]
        filter: HistoryFilterArgs,
    },
    /// History of one claim
    For {
        reclamation: i64,

        #[arg(long)]
        json: bool,
    },
    /// History statistics
    Stats {
        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Download the history
    Export {
        #[command(flatten)]
        filter: HistoryFilterArgs,

        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct HistoryFilterArgs {
    /// Only this claim
    #[arg(long)]
    pub reclamation: Option<i64>,

    /// Acting user
    #[arg(long)]
    pub user: Option<String>,

    #[arg(long, value_parser = parse_action_type)]
    pub action: Option<ActionType>,

    #[arg(long, value_parser = parse_actor_role)]
    pub role: Option<ActorRole>,

    /// On or after
    #[arg(long)]
    pub from: Option<String>,

    /// On or before
    #[arg(long)]
    pub to: Option<String>,
}

impl From<&HistoryFilterArgs> for HistoriqueFilter {
    fn from(args: &HistoryFilterArgs) -> Self {
        HistoriqueFilter {
            reclamation_id: args.reclamation,
            utilisateur: args.user.clone(),
            action: args.action,
            role_utilisateur: args.role,
            date_debut: args.from.clone(),
            date_fin: args.to.clone(),
        }
    }
}

/// Collections reachable from `browse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowseTarget {
    Assets,
    Categories,
    Services,
    Interventions,
    Reclamations,
    Technicians,
    Users,
    Notifications,
    History,
}

enum_display_fromstr!(BrowseTarget, "collection", {
    Assets => "assets",
    Categories => "categories",
    Services => "services",
    Interventions => "interventions",
    Reclamations => "reclamations",
    Technicians => "technicians",
    Users => "users",
    Notifications => "notifications",
    History => "history",
});

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            cmd_assets, cmd_browse, cmd_categories, cmd_config_get, cmd_config_set,
            cmd_config_show, cmd_history, cmd_interventions, cmd_login, cmd_logout,
            cmd_notifications, cmd_password, cmd_reclamations, cmd_refresh, cmd_register,
            cmd_services, cmd_technicians, cmd_users, cmd_whoami,
        };

        match self {
            Commands::Login {
                email,
                password,
                json,
            } => cmd_login(&email, password, OutputOptions::new(json)).await,
            Commands::Logout { json } => cmd_logout(OutputOptions::new(json)).await,
            Commands::Whoami { json } => cmd_whoami(OutputOptions::new(json)),
            Commands::Refresh { json } => cmd_refresh(OutputOptions::new(json)).await,
            Commands::Register {
                first_name,
                last_name,
                email,
                password,
                role,
                json,
            } => {
                cmd_register(
                    first_name,
                    last_name,
                    email,
                    password,
                    role,
                    OutputOptions::new(json),
                )
                .await
            }
            Commands::Password { action } => cmd_password(action).await,

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(OutputOptions::new(json)),
                ConfigAction::Set { key, value, json } => {
                    cmd_config_set(&key, &value, OutputOptions::new(json))
                }
                ConfigAction::Get { key, json } => cmd_config_get(&key, OutputOptions::new(json)),
            },

            Commands::Assets { action } => cmd_assets(action).await,
            Commands::Categories { action } => cmd_categories(action).await,
            Commands::Services { action } => cmd_services(action).await,
            Commands::Interventions { action } => cmd_interventions(action).await,
            Commands::Reclamations { action } => cmd_reclamations(action).await,
            Commands::Technicians { action } => cmd_technicians(action).await,
            Commands::Users { action } => cmd_users(action).await,
            Commands::Notifications { action } => cmd_notifications(action).await,
            Commands::History { action } => cmd_history(action).await,

            Commands::Browse { target, search } => cmd_browse(target, search).await,

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_wire<T: FromStr>(s: &str, field_name: &str, valid_values: &[&str]) -> Result<T, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        field_name,
        valid_values,
    )
}

fn parse_asset_status(s: &str) -> Result<AssetStatus, String> {
    parse_wire(s, "asset status", AssetStatus::VALID)
}

fn parse_asset_category(s: &str) -> Result<AssetCategory, String> {
    parse_wire(s, "asset category", AssetCategory::VALID)
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    parse_wire(s, "priority", Priority::VALID)
}

fn parse_intervention_status(s: &str) -> Result<InterventionStatus, String> {
    parse_wire(s, "intervention status", InterventionStatus::VALID)
}

fn parse_intervention_type(s: &str) -> Result<InterventionType, String> {
    parse_wire(s, "intervention type", InterventionType::VALID)
}

fn parse_reclamation_status(s: &str) -> Result<ReclamationStatus, String> {
    parse_wire(s, "claim status", ReclamationStatus::VALID)
}

fn parse_reclamation_type(s: &str) -> Result<ReclamationType, String> {
    parse_wire(s, "claim type", ReclamationType::VALID)
}

fn parse_user_role(s: &str) -> Result<UserRole, String> {
    parse_wire(s, "role", UserRole::VALID)
}

fn parse_notification_status(s: &str) -> Result<NotificationStatus, String> {
    parse_wire(s, "notification status", NotificationStatus::VALID)
}

fn parse_notification_type(s: &str) -> Result<NotificationType, String> {
    parse_wire(s, "notification type", NotificationType::VALID)
}

fn parse_notification_priority(s: &str) -> Result<NotificationPriority, String> {
    parse_wire(s, "notification priority", NotificationPriority::VALID)
}

fn parse_action_type(s: &str) -> Result<ActionType, String> {
    parse_wire(s, "action", ActionType::VALID)
}

fn parse_actor_role(s: &str) -> Result<ActorRole, String> {
    parse_wire(s, "actor role", ActorRole::VALID)
}

fn parse_export_format(s: &str) -> Result<ExportFormat, String> {
    parse_wire(s, "export format", ExportFormat::VALID)
}

fn parse_owner(s: &str) -> Result<InterventionOwner, String> {
    parse_wire(s, "owner", InterventionOwner::VALID)
}

fn parse_browse_target(s: &str) -> Result<BrowseTarget, String> {
    parse_wire(s, "collection", BrowseTarget::VALID)
}

fn parse_bool_strict(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(format!(
            "Invalid boolean value '{s}'. Must be 'true' or 'false'"
        )),
    }
}

fn parse_page(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("Invalid value '{s}'. Must be a number of at least 1")),
    }
}

fn parse_satisfaction(s: &str) -> Result<u8, String> {
    s.parse::<u8>()
        .ok()
        .and_then(|n| crate::gateway::check_satisfaction(n).ok())
        .ok_or_else(|| format!("Invalid satisfaction '{s}'. Must be 1, 2, 3, 4 or 5"))
}

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex should be valid")
});

fn parse_email(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if EMAIL.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(format!("Invalid email address '{s}'"))
    }
}

fn parse_field_value(s: &str) -> Result<FieldArg, String> {
    let Some((field, value)) = s.split_once('=') else {
        return Err(format!("Invalid filter '{s}'. Expected FIELD=VALUE"));
    };
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("Invalid filter '{s}'. Field name cannot be empty"));
    }
    Ok(FieldArg {
        field: field.to_string(),
        value: value.trim().to_string(),
    })
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "gactifs", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bool_strict() {
        assert!(parse_bool_strict("TRUE").unwrap());
        assert!(!parse_bool_strict("false").unwrap());
        assert!(parse_bool_strict("yes").is_err());
    }

    #[test]
    fn test_parse_wire_values_case_insensitive() {
        assert_eq!(parse_asset_status("en_panne").unwrap(), AssetStatus::EnPanne);
        assert_eq!(parse_user_role("Admin").unwrap(), UserRole::Admin);
        let err = parse_priority("urgent").unwrap_err();
        assert!(err.contains("CRITIQUE"));
        assert!(err.contains("priority"));
    }

    #[test]
    fn test_parse_field_value() {
        let arg = parse_field_value("etat = EN_PANNE").unwrap();
        assert_eq!(arg.field, "etat");
        assert_eq!(arg.value, "EN_PANNE");
        assert_eq!(parse_field_value("nom=").unwrap().value, "");
        assert!(parse_field_value("etat").is_err());
        assert!(parse_field_value("=x").is_err());
    }

    #[test]
    fn test_parse_email() {
        assert_eq!(parse_email(" awa@gactifs.sn ").unwrap(), "awa@gactifs.sn");
        assert!(parse_email("awa").is_err());
        assert!(parse_email("awa@local").is_err());
    }

    #[test]
    fn test_parse_satisfaction_range() {
        assert_eq!(parse_satisfaction("5").unwrap(), 5);
        assert!(parse_satisfaction("0").is_err());
        assert!(parse_satisfaction("six").is_err());
    }

    #[test]
    fn test_parse_page_rejects_zero() {
        assert_eq!(parse_page("3").unwrap(), 3);
        assert!(parse_page("0").is_err());
    }

    #[test]
    fn test_list_args_parse() {
        let cli = Cli::try_parse_from([
            "gactifs", "assets", "ls", "--where", "etat=EN_PANNE", "--between",
            "valeur=100..500", "--sort", "nom", "--desc", "--page", "2", "--status",
            "en_service",
        ])
        .unwrap();
        let Commands::Assets {
            action: AssetAction::Ls { list, status, .. },
        } = cli.command
        else {
            panic!("expected assets ls");
        };
        assert_eq!(list.equals[0].field, "etat");
        assert_eq!(list.between[0].value, "100..500");
        assert_eq!(list.sort.as_deref(), Some("nom"));
        assert!(list.desc);
        assert_eq!(list.page, 2);
        assert_eq!(status, Some(AssetStatus::EnService));
    }

    #[test]
    fn test_mutations_accept_json_flag() {
        let cli = Cli::try_parse_from(["gactifs", "assets", "delete", "4", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Assets {
                action: AssetAction::Delete { id: 4, json: true },
            }
        ));

        let cli = Cli::try_parse_from([
            "gactifs", "interventions", "bulk-assign", "7", "1", "2", "--json",
        ])
        .unwrap();
        let Commands::Interventions {
            action: InterventionAction::BulkAssign { technician, ids, json },
        } = cli.command
        else {
            panic!("expected interventions bulk-assign");
        };
        assert_eq!(technician, 7);
        assert_eq!(ids, vec![1, 2]);
        assert!(json);

        let cli = Cli::try_parse_from(["gactifs", "history", "export", "-o", "h.xlsx", "--json"])
            .unwrap();
        let Commands::History {
            action: HistoryAction::Export { export, .. },
        } = cli.command
        else {
            panic!("expected history export");
        };
        assert!(export.json);
        assert_eq!(export.output, Some(PathBuf::from("h.xlsx")));

        let cli = Cli::try_parse_from(["gactifs", "logout"]).unwrap();
        assert!(matches!(cli.command, Commands::Logout { json: false }));
    }

    #[test]
    fn test_comment_and_technician_commands() {
        let cli = Cli::try_parse_from(["gactifs", "r", "comment", "8", "Toner vide"]).unwrap();
        let Commands::Reclamations {
            action: ReclamationAction::Comment { id, text, json },
        } = cli.command
        else {
            panic!("expected reclamations comment");
        };
        assert_eq!(id, 8);
        assert_eq!(text, "Toner vide");
        assert!(!json);

        let cli = Cli::try_parse_from(["gactifs", "technicians", "ls", "--active", "--json"])
            .unwrap();
        let Commands::Technicians {
            action: TechnicianAction::Ls { list, active },
        } = cli.command
        else {
            panic!("expected technicians ls");
        };
        assert!(active);
        assert!(list.json);

        let cli = Cli::try_parse_from(["gactifs", "browse", "technicians"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Browse {
                target: BrowseTarget::Technicians,
                ..
            }
        ));
    }

    #[test]
    fn test_desc_requires_sort() {
        assert!(Cli::try_parse_from(["gactifs", "assets", "ls", "--desc"]).is_err());
    }

    #[test]
    fn test_browse_target() {
        let cli = Cli::try_parse_from(["gactifs", "browse", "Interventions"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Browse {
                target: BrowseTarget::Interventions,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["gactifs", "browse", "tickets"]).is_err());
    }

    #[test]
    fn test_intervention_filter_args_map_to_backend_filter() {
        let args = InterventionFilterArgs {
            status: Some(InterventionStatus::EnCours),
            technician: Some(12),
            due_before: Some("2024-06-30".to_string()),
            ..Default::default()
        };
        let filter = InterventionFilter::from(&args);
        let query = filter.to_query();
        assert_eq!(query.get("statut"), Some("EN_COURS"));
        assert_eq!(query.get("technicienId"), Some("12"));
        assert_eq!(query.get("dateEcheanceMax"), Some("2024-06-30"));
    }
}
