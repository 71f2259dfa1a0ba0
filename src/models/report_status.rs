use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Pending,
    Verified,
    InProgress,
    Rejected,
    Actioned,
}

impl ReportStatus {
    /// Statuses that still count as an open problem on the ground.
    pub const OPEN: [ReportStatus; 3] = [
        ReportStatus::Pending,
        ReportStatus::Verified,
        ReportStatus::InProgress,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Pending => "PENDING",
            ReportStatus::Verified => "VERIFIED",
            ReportStatus::InProgress => "IN_PROGRESS",
            ReportStatus::Rejected => "REJECTED",
            ReportStatus::Actioned => "ACTIONED",
        }
    }

    pub fn parse(input: &str) -> Option<ReportStatus> {
        match input.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(ReportStatus::Pending),
            "VERIFIED" => Some(ReportStatus::Verified),
            "IN_PROGRESS" => Some(ReportStatus::InProgress),
            "REJECTED" => Some(ReportStatus::Rejected),
            "ACTIONED" => Some(ReportStatus::Actioned),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ReportStatus::Rejected | ReportStatus::Actioned)
    }
}
