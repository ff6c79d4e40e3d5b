//! Report categories recognized by file classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a surveillance report.
///
/// The category selects which indicator fragments are searched for and how
/// the header row is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// 医院感染汇总表
    InfectionSummary,
    /// 医院感染现患率
    PrevalenceRate,
    /// 手卫生依从正确率
    HandHygiene,
    /// I类切口手术部位感染率
    CleanIncisionSsi,
    /// 血管导管相关血流感染发病率
    CatheterBloodstream,
    /// 呼吸机相关肺炎发病率
    VentilatorPneumonia,
    /// 导尿管相关泌尿道感染发病率
    UrinaryCatheter,
}

impl ReportType {
    pub const ALL: [ReportType; 7] = [
        ReportType::InfectionSummary,
        ReportType::PrevalenceRate,
        ReportType::HandHygiene,
        ReportType::CleanIncisionSsi,
        ReportType::CatheterBloodstream,
        ReportType::VentilatorPneumonia,
        ReportType::UrinaryCatheter,
    ];

    /// Configuration key, as written in catalog files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::InfectionSummary => "infection_summary",
            ReportType::PrevalenceRate => "prevalence_rate",
            ReportType::HandHygiene => "hand_hygiene",
            ReportType::CleanIncisionSsi => "clean_incision_ssi",
            ReportType::CatheterBloodstream => "catheter_bloodstream",
            ReportType::VentilatorPneumonia => "ventilator_pneumonia",
            ReportType::UrinaryCatheter => "urinary_catheter",
        }
    }

    /// Report title as it appears in source file names.
    pub fn title(&self) -> &'static str {
        match self {
            ReportType::InfectionSummary => "医院感染汇总表",
            ReportType::PrevalenceRate => "医院感染现患率",
            ReportType::HandHygiene => "手卫生依从正确率",
            ReportType::CleanIncisionSsi => "I类切口手术部位感染率",
            ReportType::CatheterBloodstream => "血管导管相关血流感染发病率",
            ReportType::VentilatorPneumonia => "呼吸机相关肺炎发病率",
            ReportType::UrinaryCatheter => "导尿管相关泌尿道感染发病率",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = String;

    /// Accepts either the configuration key (case-insensitive) or the report title.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ReportType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed) || kind.title() == trimmed)
            .ok_or_else(|| format!("Unknown report type: {s}"))
    }
}
