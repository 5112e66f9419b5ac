//! Delivery stages and status-to-stage mapping

use crate::types::DeliveryStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDefinition {
    pub label: &'static str,
    pub description: &'static str,
}

/// Ordered delivery stages. The index is the stage ordinal.
pub const STAGES: [StageDefinition; 4] = [
    StageDefinition {
        label: "Commande confirmée",
        description: "Votre commande a été confirmée",
    },
    StageDefinition {
        label: "En préparation",
        description: "Votre commande est en cours de préparation",
    },
    StageDefinition {
        label: "En route",
        description: "Le livreur est en route vers votre adresse",
    },
    StageDefinition {
        label: "Livrée",
        description: "Votre commande a été livrée",
    },
];

pub const LAST_STAGE: usize = STAGES.len() - 1;

/// Where a stage sits relative to the current one in the stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageProgress {
    Completed,
    Current,
    Upcoming,
}

pub fn stage_for(status: Option<DeliveryStatus>) -> usize {
    match status {
        Some(DeliveryStatus::Confirmed) => 0,
        Some(DeliveryStatus::Preparing) => 1,
        Some(DeliveryStatus::InTransit) => 2,
        Some(DeliveryStatus::Delivered) => 3,
        None => 0,
    }
}

/// Map a raw status string to its stage ordinal. Unknown or missing
/// statuses land on the first stage.
pub fn map_status_to_stage(status: Option<&str>) -> usize {
    stage_for(status.and_then(|s| s.parse().ok()))
}

pub fn stage_definition(ordinal: usize) -> &'static StageDefinition {
    &STAGES[ordinal.min(LAST_STAGE)]
}

pub fn stage_progress(current: usize, index: usize) -> StageProgress {
    use std::cmp::Ordering;

    match index.cmp(&current) {
        Ordering::Less => StageProgress::Completed,
        Ordering::Equal => StageProgress::Current,
        Ordering::Greater => StageProgress::Upcoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_map_to_their_ordinal() {
        assert_eq!(map_status_to_stage(Some("CONFIRMED")), 0);
        assert_eq!(map_status_to_stage(Some("PREPARING")), 1);
        assert_eq!(map_status_to_stage(Some("IN_TRANSIT")), 2);
        assert_eq!(map_status_to_stage(Some("DELIVERED")), 3);
    }

    #[test]
    fn unknown_or_missing_status_maps_to_first_stage() {
        for status in ["", "CANCELLED", "delivered", "IN TRANSIT", "🚚"] {
            assert_eq!(map_status_to_stage(Some(status)), 0, "status {status:?}");
        }
        assert_eq!(map_status_to_stage(None), 0);
        assert_eq!(stage_for(None), 0);
    }

    #[test]
    fn stage_definition_clamps_out_of_range() {
        assert_eq!(stage_definition(2).label, "En route");
        assert_eq!(stage_definition(42), &STAGES[LAST_STAGE]);
    }

    #[test]
    fn stepper_progress() {
        let progress: Vec<_> = (0..STAGES.len()).map(|i| stage_progress(1, i)).collect();
        assert_eq!(
            progress,
            vec![
                StageProgress::Completed,
                StageProgress::Current,
                StageProgress::Upcoming,
                StageProgress::Upcoming,
            ]
        );
    }
}
