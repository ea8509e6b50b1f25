//! Normalized three-column ad copy.

use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as Json;

/// Generated ad copy: one ordered list of variants per column, with optional
/// image URLs running parallel to each list.
///
/// Image lists may be shorter than their text list; entry `i` of an image
/// list belongs to entry `i` of the text list, and missing, `null` or empty
/// entries have no image.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdResult {
    pub primary_text: Vec<String>,
    pub headline: Vec<String>,
    pub description: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_images",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary_text_images: Option<Vec<Option<String>>>,
    #[serde(
        default,
        deserialize_with = "lenient_images",
        skip_serializing_if = "Option::is_none"
    )]
    pub headline_images: Option<Vec<Option<String>>>,
    #[serde(
        default,
        deserialize_with = "lenient_images",
        skip_serializing_if = "Option::is_none"
    )]
    pub description_images: Option<Vec<Option<String>>>,
}

/// Image lists are optional extras: a list that is not an array reads as
/// absent, and entries that are not strings read as "no image".
fn lenient_images<'de, D>(deserializer: D) -> Result<Option<Vec<Option<String>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let images = match Json::deserialize(deserializer)? {
        Json::Array(entries) => Some(
            entries
                .into_iter()
                .map(|entry| match entry {
                    Json::String(url) => Some(url),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    };
    Ok(images)
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    #[display("Primary Text")]
    PrimaryText,
    #[display("Headline")]
    Headline,
    #[display("Description")]
    Description,
}

impl Column {
    pub const ALL: [Self; 3] = [Self::PrimaryText, Self::Headline, Self::Description];
}

/// Borrowed view of one column of an [`AdResult`].
#[derive(Debug, Clone, Copy)]
pub struct ColumnView<'a> {
    pub column: Column,
    pub texts: &'a [String],
    pub images: Option<&'a [Option<String>]>,
}

impl<'a> ColumnView<'a> {
    /// Image URL for entry `index`, if one was supplied.
    #[must_use]
    pub fn image_at(&self, index: usize) -> Option<&'a str> {
        self.images?
            .get(index)?
            .as_deref()
            .filter(|url| !url.is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Text entries paired with their image, in order.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, Option<&'a str>)> + '_ {
        self.texts
            .iter()
            .enumerate()
            .map(move |(i, text)| (text.as_str(), self.image_at(i)))
    }
}

impl AdResult {
    /// Wrap a single variant as one-element columns without images.
    pub fn single(
        text: impl Into<String>,
        headline: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            primary_text: vec![text.into()],
            headline: vec![headline.into()],
            description: vec![description.into()],
            ..Self::default()
        }
    }

    /// Canned sample copy shown when the webhook's answer cannot be read.
    #[must_use]
    pub fn placeholder() -> Self {
        let samples = |label: &str| -> Vec<String> {
            (1..=3).map(|i| format!("Sample {label} {i}")).collect()
        };

        Self {
            primary_text: samples("primary text"),
            headline: samples("headline"),
            description: samples("description"),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn column(&self, column: Column) -> ColumnView<'_> {
        let (texts, images) = match column {
            Column::PrimaryText => (&self.primary_text, &self.primary_text_images),
            Column::Headline => (&self.headline, &self.headline_images),
            Column::Description => (&self.description, &self.description_images),
        };

        ColumnView {
            column,
            texts,
            images: images.as_deref(),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = ColumnView<'_>> {
        Column::ALL.into_iter().map(move |column| self.column(column))
    }

    /// Total number of text variants across all columns.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.primary_text.len() + self.headline.len() + self.description.len()
    }
}
