use owo_colors::OwoColorize;
use tabled::Tabled;

use crate::models::{
    Asset, Category, Entity, HistoriqueEntry, Intervention, Notification, Reclamation,
    ServiceDirection, Technicien, User,
};

use super::badges::{active_badge, opt_badge};
use super::{dash, format_amount, short_date};

/// An entity that can be listed as a table row.
pub trait TableRow: Entity {
    type Row: Tabled;

    fn row(&self) -> Self::Row;
}

fn id_cell<T: ToString>(id: Option<T>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

#[derive(Tabled)]
pub struct AssetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    nom: String,
    #[tabled(rename = "Reference")]
    reference: String,
    #[tabled(rename = "Category")]
    categorie: String,
    #[tabled(rename = "Status")]
    etat: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Value")]
    valeur: String,
    #[tabled(rename = "Acquired")]
    acquisition: String,
}

impl TableRow for Asset {
    type Row = AssetRow;

    fn row(&self) -> AssetRow {
        AssetRow {
            id: id_cell(self.id),
            nom: self.nom.clone(),
            reference: dash(self.reference.as_deref()),
            categorie: self
                .categorie
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            etat: opt_badge(self.etat.as_ref()),
            service: dash(
                self.service
                    .as_ref()
                    .and_then(|s| s.service_name.as_deref()),
            ),
            valeur: format_amount(self.valeur),
            acquisition: short_date(self.date_acquisition.as_deref()),
        }
    }
}

#[derive(Tabled)]
pub struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    nom: String,
    #[tabled(rename = "State")]
    actif: String,
    #[tabled(rename = "Assets")]
    assets: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl TableRow for Category {
    type Row = CategoryRow;

    fn row(&self) -> CategoryRow {
        CategoryRow {
            id: id_cell(self.id),
            code: self.code.clone(),
            nom: self.nom.clone(),
            actif: active_badge(self.actif),
            assets: id_cell(self.nombre_actifs),
            created: short_date(self.date_creation.as_deref()),
        }
    }
}

#[derive(Tabled)]
pub struct ServiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Head")]
    responsable: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "State")]
    actif: String,
}

impl TableRow for ServiceDirection {
    type Row = ServiceRow;

    fn row(&self) -> ServiceRow {
        ServiceRow {
            id: id_cell(self.id),
            code: dash(self.code.as_deref()),
            name: dash(self.service_name.as_deref()),
            responsable: dash(self.responsable.as_deref()),
            email: dash(self.email.as_deref()),
            actif: self
                .actif
                .map(active_badge)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Tabled)]
pub struct InterventionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    titre: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Priority")]
    priorite: String,
    #[tabled(rename = "Status")]
    statut: String,
    #[tabled(rename = "Technician")]
    technicien: String,
    #[tabled(rename = "Due")]
    echeance: String,
}

impl TableRow for Intervention {
    type Row = InterventionRow;

    fn row(&self) -> InterventionRow {
        InterventionRow {
            id: id_cell(self.id),
            titre: self.titre.clone(),
            kind: self
                .type_intervention
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
            priorite: opt_badge(self.priorite.as_ref()),
            statut: opt_badge(self.statut.as_ref()),
            technicien: self
                .technicien_assigne
                .as_ref()
                .map(|t| t.full_name())
                .unwrap_or_else(|| "-".to_string()),
            echeance: short_date(self.date_echeance.as_deref()),
        }
    }
}

#[derive(Tabled)]
pub struct ReclamationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Number")]
    numero: String,
    #[tabled(rename = "Subject")]
    objet: String,
    #[tabled(rename = "Priority")]
    priorite: String,
    #[tabled(rename = "Status")]
    statut: String,
    #[tabled(rename = "Claimant")]
    reclamant: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Due")]
    due: String,
}

impl TableRow for Reclamation {
    type Row = ReclamationRow;

    fn row(&self) -> ReclamationRow {
        ReclamationRow {
            id: id_cell(self.id),
            numero: dash(self.numero.as_deref()),
            objet: self.objet.clone(),
            priorite: opt_badge(self.priorite.as_ref()),
            statut: opt_badge(self.statut.as_ref()),
            reclamant: dash(self.reclamant_nom.as_deref()),
            created: short_date(self.date_creation.as_deref()),
            due: due_cell(self),
        }
    }
}

fn due_cell(reclamation: &Reclamation) -> String {
    let due = short_date(reclamation.date_echeance.as_deref());
    if reclamation.is_overdue() {
        format!("{} {}", due, "late".red())
    } else {
        due
    }
}

#[derive(Tabled)]
pub struct TechnicianRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    telephone: String,
    #[tabled(rename = "Specialty")]
    specialite: String,
    #[tabled(rename = "State")]
    actif: String,
}

impl TableRow for Technicien {
    type Row = TechnicianRow;

    fn row(&self) -> TechnicianRow {
        TechnicianRow {
            id: id_cell(self.id),
            name: self.full_name(),
            email: dash(self.email.as_deref()),
            telephone: dash(self.telephone.as_deref()),
            specialite: dash(self.specialite.as_deref()),
            actif: self
                .actif
                .map(active_badge)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "State")]
    active: String,
}

impl TableRow for User {
    type Row = UserRow;

    fn row(&self) -> UserRow {
        UserRow {
            id: id_cell(self.id.as_deref()),
            name: self.full_name(),
            email: self.email.clone(),
            role: opt_badge(self.role.as_ref()),
            active: active_badge(self.is_active),
        }
    }
}

#[derive(Tabled)]
pub struct NotificationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    titre: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Priority")]
    priorite: String,
    #[tabled(rename = "Status")]
    statut: String,
    #[tabled(rename = "Date")]
    date: String,
}

impl TableRow for Notification {
    type Row = NotificationRow;

    fn row(&self) -> NotificationRow {
        NotificationRow {
            id: id_cell(self.id),
            titre: self.titre.clone(),
            kind: self
                .kind
                .map(|k| k.to_string())
                .unwrap_or_else(|| "-".to_string()),
            priorite: opt_badge(self.priorite.as_ref()),
            statut: opt_badge(self.statut.as_ref()),
            date: short_date(self.date_creation.as_deref()),
        }
    }
}

#[derive(Tabled)]
pub struct HistoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Reclamation")]
    reclamation: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "User")]
    utilisateur: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Date")]
    date: String,
}

impl TableRow for HistoriqueEntry {
    type Row = HistoryRow;

    fn row(&self) -> HistoryRow {
        HistoryRow {
            id: id_cell(self.id),
            reclamation: self
                .reclamation_numero
                .clone()
                .or_else(|| self.reclamation_id.map(|id| id.to_string()))
                .unwrap_or_else(|| "-".to_string()),
            action: self
                .action
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string()),
            utilisateur: self.utilisateur.clone(),
            role: self
                .role_utilisateur
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string()),
            date: short_date(self.date_action.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetStatus, ReclamationStatus};

    #[test]
    fn test_asset_row_fills_missing_values() {
        let asset = Asset {
            id: Some(3),
            nom: "GPS".to_string(),
            etat: Some(AssetStatus::EnService),
            date_acquisition: Some("2022-11-04T08:00:00".to_string()),
            ..Default::default()
        };
        let row = asset.row();
        assert_eq!(row.id, "3");
        assert_eq!(row.reference, "-");
        assert_eq!(row.acquisition, "2022-11-04");
        assert!(row.etat.contains("EN_SERVICE"));
    }

    #[test]
    fn test_reclamation_row_flags_late_claims() {
        let mut reclamation = Reclamation {
            id: Some(8),
            objet: "Imprimante bloquée".to_string(),
            statut: Some(ReclamationStatus::EnCours),
            date_echeance: Some("2020-01-15".to_string()),
            ..Default::default()
        };
        let row = reclamation.row();
        assert!(row.due.starts_with("2020-01-15"));
        assert!(row.due.contains("late"));

        reclamation.statut = Some(ReclamationStatus::Resolue);
        assert_eq!(reclamation.row().due, "2020-01-15");

        reclamation.date_echeance = None;
        assert_eq!(reclamation.row().due, "-");
    }

    #[test]
    fn test_technician_row() {
        let technicien = Technicien {
            id: Some(5),
            nom: "Sarr".to_string(),
            prenom: "Moussa".to_string(),
            specialite: Some("Réseaux".to_string()),
            ..Default::default()
        };
        let row = technicien.row();
        assert_eq!(row.name, "Moussa Sarr");
        assert_eq!(row.email, "-");
        assert_eq!(row.specialite, "Réseaux");
        assert_eq!(row.actif, "-");
    }
}
