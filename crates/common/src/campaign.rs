//! Campaign request sent to the generation webhook.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::AdKitError;

/// What the campaign optimizes for.
#[derive(Debug, Display, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CampaignGoal {
    #[display("traffic")]
    Traffic,
    #[display("conversions")]
    Conversions,
    #[display("retargeting")]
    Retargeting,
}

impl CampaignGoal {
    pub const ALL: [Self; 3] = [Self::Traffic, Self::Conversions, Self::Retargeting];
}

impl FromStr for CampaignGoal {
    type Err = AdKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "traffic" => Ok(Self::Traffic),
            "conversions" => Ok(Self::Conversions),
            "retargeting" => Ok(Self::Retargeting),
            other => Err(AdKitError::Validation {
                message: format!(
                    "unknown campaign goal '{other}' (expected traffic, conversions or retargeting)"
                ),
            }),
        }
    }
}

/// Tone of the generated copy.
#[derive(Debug, Display, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CreativeStyle {
    #[display("clean")]
    Clean,
    /// User-generated-content look.
    #[display("ugc")]
    Ugc,
    #[display("meme")]
    Meme,
}

impl CreativeStyle {
    pub const ALL: [Self; 3] = [Self::Clean, Self::Ugc, Self::Meme];
}

impl FromStr for CreativeStyle {
    type Err = AdKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clean" => Ok(Self::Clean),
            "ugc" => Ok(Self::Ugc),
            "meme" => Ok(Self::Meme),
            other => Err(AdKitError::Validation {
                message: format!("unknown creative style '{other}' (expected clean, ugc or meme)"),
            }),
        }
    }
}

/// Body of the generation request. Built fresh for every submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRequest {
    pub item_description: String,
    pub campaign_goal: CampaignGoal,
    pub creative_style: CreativeStyle,
}

impl CampaignRequest {
    pub fn new(
        item_description: impl Into<String>,
        campaign_goal: CampaignGoal,
        creative_style: CreativeStyle,
    ) -> Self {
        Self {
            item_description: item_description.into(),
            campaign_goal,
            creative_style,
        }
    }
}
