use owo_colors::OwoColorize;

use crate::models::{
    AssetStatus, InterventionStatus, NotificationPriority, NotificationStatus, Priority,
    ReclamationStatus, UserRole,
};

/// Colored rendering of an enum value for terminal tables.
pub trait Badge {
    fn badge(&self) -> String;
}

impl Badge for AssetStatus {
    fn badge(&self) -> String {
        let label = self.as_str();
        match self {
            AssetStatus::EnService => label.green().to_string(),
            AssetStatus::EnPanne => label.red().to_string(),
            AssetStatus::EnMaintenance => label.yellow().to_string(),
            AssetStatus::HorsUsage => label.dimmed().to_string(),
        }
    }
}

impl Badge for Priority {
    fn badge(&self) -> String {
        let label = self.as_str();
        match self {
            Priority::Critique => label.red().bold().to_string(),
            Priority::Haute => label.yellow().to_string(),
            Priority::Moyenne => label.to_string(),
            Priority::Basse => label.dimmed().to_string(),
        }
    }
}

impl Badge for InterventionStatus {
    fn badge(&self) -> String {
        let label = self.as_str();
        match self {
            InterventionStatus::Planifiee => label.blue().to_string(),
            InterventionStatus::EnAttente => label.yellow().to_string(),
            InterventionStatus::EnCours => label.cyan().to_string(),
            InterventionStatus::Suspendue => label.magenta().to_string(),
            InterventionStatus::Terminee => label.green().to_string(),
            InterventionStatus::Validee => label.green().bold().to_string(),
            InterventionStatus::Annulee => label.dimmed().to_string(),
        }
    }
}

impl Badge for ReclamationStatus {
    fn badge(&self) -> String {
        let label = self.as_str();
        match self {
            ReclamationStatus::Nouvelle => label.yellow().bold().to_string(),
            ReclamationStatus::EnAttente => label.yellow().to_string(),
            ReclamationStatus::EnCours => label.cyan().to_string(),
            ReclamationStatus::EnAttenteClient => label.magenta().to_string(),
            ReclamationStatus::Resolue => label.green().to_string(),
            ReclamationStatus::Fermee | ReclamationStatus::Annulee => label.dimmed().to_string(),
        }
    }
}

impl Badge for NotificationPriority {
    fn badge(&self) -> String {
        let label = self.as_str();
        match self {
            NotificationPriority::Critique => label.red().bold().to_string(),
            NotificationPriority::Haute => label.yellow().to_string(),
            NotificationPriority::Normale => label.to_string(),
            NotificationPriority::Basse => label.dimmed().to_string(),
        }
    }
}

impl Badge for NotificationStatus {
    fn badge(&self) -> String {
        let label = self.as_str();
        match self {
            NotificationStatus::NonLue => label.yellow().bold().to_string(),
            NotificationStatus::Lue => label.to_string(),
            NotificationStatus::Archivee => label.dimmed().to_string(),
        }
    }
}

impl Badge for UserRole {
    fn badge(&self) -> String {
        let label = self.as_str();
        match self {
            UserRole::Admin => label.magenta().to_string(),
            UserRole::Responsable => label.cyan().to_string(),
            UserRole::Technicien => label.to_string(),
        }
    }
}

pub fn active_badge(active: bool) -> String {
    if active {
        "active".green().to_string()
    } else {
        "inactive".dimmed().to_string()
    }
}

/// Badge of an optional value, `-` when absent.
pub fn opt_badge<B: Badge>(value: Option<&B>) -> String {
    value.map(Badge::badge).unwrap_or_else(|| "-".to_string())
}
