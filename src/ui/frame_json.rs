use serde_json::Value;

use crate::picker::Frame;

/// The popup's cells as plain JSON, for surfaces that build their own markup.
///
/// This is the `Serialize` form of [`Frame`] with the header's display label
/// added, so a web surface does not have to re-derive `2022年 1月`.
pub fn frame_to_json(frame: &Frame) -> serde_json::Result<Value> {
    let mut json = serde_json::to_value(frame)?;
    if let Some(header) = json.get_mut("header").and_then(Value::as_object_mut) {
        header.insert("label".to_string(), Value::String(frame.header.label()));
    }
    Ok(json)
}
