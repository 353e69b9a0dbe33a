//! Review row records
//!
//! The wire shapes the grid exchanges with the server. Field names follow
//! the grid's camelCase convention (`foodItem`); all content fields are
//! optional free-text strings, and `id` is assigned by storage.

use serde::{Deserialize, Serialize};

/// The editable content fields of a review row.
///
/// Used on its own as a create draft (no id yet) and embedded in
/// [`Review`] and [`ReviewPatch`]. A field that is `None` is absent from
/// the JSON, which is how patches mark fields as untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_item: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ReviewFields {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.restaurant.is_none()
            && self.location.is_none()
            && self.review.is_none()
            && self.response.is_none()
            && self.food_item.is_none()
            && self.sentiment.is_none()
            && self.notes.is_none()
    }

    /// Keep the values of `self` only for fields that are set in `mask`.
    ///
    /// The update endpoint echoes back exactly the patched fields, read
    /// from the stored row after the write. Masking the stored fields by
    /// the incoming patch produces that echo.
    pub fn masked_by(&self, mask: &ReviewFields) -> ReviewFields {
        ReviewFields {
            restaurant: mask.restaurant.as_ref().and(self.restaurant.clone()),
            location: mask.location.as_ref().and(self.location.clone()),
            review: mask.review.as_ref().and(self.review.clone()),
            response: mask.response.as_ref().and(self.response.clone()),
            food_item: mask.food_item.as_ref().and(self.food_item.clone()),
            sentiment: mask.sentiment.as_ref().and(self.sentiment.clone()),
            notes: mask.notes.as_ref().and(self.notes.clone()),
        }
    }
}

/// One persisted review row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,

    #[serde(flatten)]
    pub fields: ReviewFields,
}

/// A partial update of one row: the target id plus the fields to change.
///
/// Also serves as the update response shape (id + the patched fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPatch {
    pub id: i64,

    #[serde(flatten)]
    pub fields: ReviewFields,
}
