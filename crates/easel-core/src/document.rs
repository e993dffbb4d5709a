//! Serialized document format.
//!
//! A document is a JSON object with `width`, `height` and an ordered
//! `objects` array. Exactly one entry of `objects` carries the reserved
//! [`WORKSPACE_ID`]; it describes the document bounds.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::bounds::DocumentBounds;
use crate::error::{CoreError, CoreResult};
use crate::object::{SceneObject, WORKSPACE_ID};

/// A document as exchanged with storage and codecs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedDocument {
    /// Document width.
    pub width: f64,
    /// Document height.
    pub height: f64,
    /// Objects in paint order, workspace included.
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    /// Top-level attributes the core does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SerializedDocument {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if the text is not a valid
    /// document.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if the value is not a valid
    /// document.
    pub fn from_value(value: Value) -> CoreResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Convert to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if encoding fails.
    pub fn to_value(&self) -> CoreResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Encode as pretty-printed JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if encoding fails.
    pub fn to_json_string(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The entry carrying the reserved workspace id, if any.
    #[must_use]
    pub fn workspace_object(&self) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id.as_str() == WORKSPACE_ID)
    }

    /// Iterate over every entry except the workspace.
    pub fn user_objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| !o.id.is_workspace())
    }

    /// Split into bounds and user objects.
    ///
    /// A document without a workspace entry gets bounds from its top-level
    /// `width`/`height`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedDocument`] if more than one entry
    /// carries the reserved id, or if the bounds are not positive.
    pub fn into_parts(self) -> CoreResult<(DocumentBounds, Vec<SceneObject>)> {
        let workspace_count = self.objects.iter().filter(|o| o.id.is_workspace()).count();
        if workspace_count > 1 {
            return Err(CoreError::MalformedDocument(format!(
                "document contains {workspace_count} workspace objects"
            )));
        }

        let bounds = match self.workspace_object() {
            Some(obj) => DocumentBounds::from_object(obj)?,
            None => {
                let mut bounds = DocumentBounds::default();
                bounds.resize(self.width, self.height)?;
                bounds
            },
        };

        let objects = self
            .objects
            .into_iter()
            .filter(|o| !o.id.is_workspace())
            .collect();
        Ok((bounds, objects))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectKind;

    fn sample() -> Value {
        serde_json::json!({
            "version": "5.3.0",
            "width": 400.0,
            "height": 300.0,
            "objects": [
                { "id": "workspace", "type": "rect", "width": 400.0, "height": 300.0, "fill": "#fff" },
                { "id": "r1", "type": "rect", "left": 10.0, "top": 10.0, "width": 20.0, "height": 20.0 }
            ]
        })
    }

    #[test]
    fn test_parse_and_split() {
        let doc = SerializedDocument::from_value(sample()).unwrap();
        assert_eq!(doc.extra.get("version"), Some(&serde_json::json!("5.3.0")));
        assert!(doc.workspace_object().is_some());
        assert_eq!(doc.user_objects().count(), 1);

        let (bounds, objects) = doc.into_parts().unwrap();
        assert_eq!(bounds.width(), 400.0);
        assert!(bounds.is_protected());
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].kind, ObjectKind::Rect);
    }

    #[test]
    fn test_missing_workspace_uses_top_level_size() {
        let doc = SerializedDocument::from_value(serde_json::json!({
            "width": 50.0, "height": 60.0, "objects": []
        }))
        .unwrap();
        let (bounds, objects) = doc.into_parts().unwrap();
        assert_eq!(bounds.height(), 60.0);
        assert!(objects.is_empty());
    }

    #[test]
    fn test_duplicate_workspace_is_malformed() {
        let mut value = sample();
        let ws = value["objects"][0].clone();
        value["objects"].as_array_mut().unwrap().push(ws);
        let doc = SerializedDocument::from_value(value).unwrap();
        assert!(matches!(doc.into_parts(), Err(CoreError::MalformedDocument(_))));
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        assert!(matches!(
            SerializedDocument::from_json_str("{ not json"),
            Err(CoreError::Serialization(_))
        ));
        assert!(SerializedDocument::from_json_str(r#"{"objects": []}"#).is_err());
    }
}
