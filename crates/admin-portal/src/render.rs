//! Plain-text rendering of portal views

use krishi_common::{Claim, Farm, Officer};
use std::fmt::Write;

use crate::claims::ClaimsDashboard;
use crate::decision::{DecisionWorkflow, WorkflowState};
use crate::farms::FarmVerification;
use crate::guard::Route;
use crate::list_view::ListState;

/// Header with the nav links and the signed-in officer
pub fn header(officer: Option<&Officer>) -> String {
    match officer {
        Some(officer) => format!(
            "Krishi Suraksha Admin | Farm Verification ({}) | Claims Dashboard ({}) | {} <{}>",
            Route::FarmVerification,
            Route::ClaimsDashboard,
            officer.name,
            officer.email
        ),
        None => format!("Krishi Suraksha Admin | Sign in ({})", Route::Login),
    }
}

fn table(out: &mut String, headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let _ = writeln!(out, "{}", line(headers.to_vec()));
    let _ = writeln!(
        out,
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ")
    );
    for row in rows {
        let _ = writeln!(out, "{}", line(row.iter().map(String::as_str).collect()));
    }
}

fn list_body<T>(
    out: &mut String,
    state: ListState<'_, T>,
    noun: &str,
    empty: &str,
    rows: impl Fn(&[T]) -> Vec<Vec<String>>,
    headers: &[&str],
) {
    match state {
        ListState::Loading => {
            let _ = writeln!(out, "Loading {}...", noun);
        }
        ListState::Failed(message) => {
            let _ = writeln!(out, "Error: {}", message);
        }
        ListState::Empty => {
            let _ = writeln!(out, "{}", empty);
        }
        ListState::Rows(items) => table(out, headers, &rows(items)),
    }
}

fn farm_rows(view: &FarmVerification) -> impl Fn(&[Farm]) -> Vec<Vec<String>> + '_ {
    move |farms: &[Farm]| {
        farms
            .iter()
            .map(|farm| {
                let action = if view.is_verifying(&farm.farm_id) {
                    "Verifying..."
                } else {
                    "Verify"
                };
                vec![
                    farm.farm_id.clone(),
                    farm.owner_farmer_id.clone(),
                    farm.crop_type.clone(),
                    farm.land_record_hash.clone(),
                    farm.status.to_string(),
                    action.to_string(),
                ]
            })
            .collect()
    }
}

pub fn farm_verification(view: &FarmVerification) -> String {
    let mut out = String::from("Farms Pending Verification\n\n");
    if let Some(alert) = view.alert() {
        let _ = writeln!(out, "! {}\n", alert);
    }
    list_body(
        &mut out,
        view.state(),
        "farms",
        "No farms are currently pending verification.",
        farm_rows(view),
        &["Farm ID", "Owner", "Crop", "Land Record", "Status", "Action"],
    );
    out
}

fn claim_rows(claims: &[Claim]) -> Vec<Vec<String>> {
    claims
        .iter()
        .map(|claim| {
            vec![
                claim.claim_id.clone(),
                claim.farmer_id.clone(),
                claim.calamity_type.clone(),
                claim.date_of_calamity.clone(),
                format!("{:.2}", claim.ndvi_value),
                format!("{}%", claim.damage_percentage),
                claim.status.to_string(),
            ]
        })
        .collect()
}

pub fn claims_dashboard(dashboard: &ClaimsDashboard) -> String {
    let summary = dashboard.summary();
    let mut out = String::from("Claims Dashboard\n\n");
    let _ = writeln!(
        out,
        "Pending review: {}    Total flagged: {}\n",
        summary.pending_review, summary.total_flagged
    );
    list_body(
        &mut out,
        dashboard.state(),
        "claims",
        "No claims are currently flagged for review.",
        claim_rows,
        &[
            "Claim ID", "Farmer", "Calamity", "Date", "NDVI", "Damage", "Status",
        ],
    );
    out
}

pub fn claim_detail(workflow: &DecisionWorkflow) -> String {
    let claim = workflow.claim();
    let mut out = format!("Claim {}\n\n", claim.claim_id);

    let fields = [
        ("Farmer ID", claim.farmer_id.clone()),
        ("Farm ID", claim.farm_id.clone()),
        ("Calamity", claim.calamity_type.clone()),
        ("Date of calamity", claim.date_of_calamity.clone()),
        ("NDVI", format!("{:.2}", claim.ndvi_value)),
        ("Damage", format!("{}%", claim.damage_percentage)),
        ("Satellite data", claim.satellite_data_hash.clone()),
        ("Evidence", claim.evidence_hash.clone()),
        ("Status", claim.status.to_string()),
    ];
    for (label, value) in fields {
        let _ = writeln!(out, "{:<18}{}", label, value);
    }
    if let Some(amount) = claim.payout_amount {
        let _ = writeln!(out, "{:<18}{}", "Payout", amount);
    }
    if let Some(reason) = &claim.reason_for_rejection {
        let _ = writeln!(out, "{:<18}{}", "Rejection reason", reason);
    }

    match workflow.state() {
        WorkflowState::Idle => {}
        WorkflowState::ApproveModalOpen => out.push_str("\n[Approve claim] Payout amount:\n"),
        WorkflowState::RejectModalOpen => out.push_str("\n[Reject claim] Reason for rejection:\n"),
        WorkflowState::Submitting(kind) => {
            let _ = writeln!(out, "\nSubmitting {} decision...", kind);
        }
    }

    if let Some(banner) = workflow.banner() {
        let _ = writeln!(out, "\n! {}", banner);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::ClaimContext;
    use crate::testing::{claim, farm, FakeService};
    use krishi_common::DecisionKind;

    #[test]
    fn test_header_shows_officer() {
        let officer = Officer::new("Asha Rao", "asha@agri.gov.in", "tok");
        let rendered = header(Some(&officer));
        assert!(rendered.contains("Asha Rao <asha@agri.gov.in>"));
        assert!(rendered.contains("/claims"));
        assert!(header(None).contains("/login"));
    }

    #[tokio::test]
    async fn test_empty_views_render_empty_messages() {
        let service = FakeService::new();

        let mut farms = FarmVerification::new();
        farms.load(&service).await.unwrap();
        assert!(farm_verification(&farms).contains("No farms are currently pending verification."));

        let mut dashboard = ClaimsDashboard::new();
        dashboard.load(&service).await.unwrap();
        let rendered = claims_dashboard(&dashboard);
        assert!(rendered.contains("No claims are currently flagged for review."));
        assert!(rendered.contains("Total flagged: 0"));
    }

    #[tokio::test]
    async fn test_rows_and_failures() {
        let service = FakeService::new().with_farms(vec![farm("F1")]);
        let mut farms = FarmVerification::new();
        assert!(farm_verification(&farms).contains("Loading farms..."));

        farms.load(&service).await.unwrap();
        let rendered = farm_verification(&farms);
        assert!(rendered.contains("F1"));
        assert!(rendered.contains("Verify"));

        service.set_offline(true);
        let _ = farms.load(&service).await;
        assert!(farm_verification(&farms).contains("Error: Failed to load farms."));
    }

    #[tokio::test]
    async fn test_claim_detail_shows_dialog_and_banner() {
        let service = FakeService::new();
        let mut wf = DecisionWorkflow::enter(Some(ClaimContext::new(claim("C1")))).unwrap();
        assert!(claim_detail(&wf).contains("Claim C1"));

        wf.open(DecisionKind::Approve).unwrap();
        let _ = wf.submit(&service, "zero").await;
        let rendered = claim_detail(&wf);
        assert!(rendered.contains("[Approve claim]"));
        assert!(rendered.contains("! Please provide a valid payout amount."));
    }
}
