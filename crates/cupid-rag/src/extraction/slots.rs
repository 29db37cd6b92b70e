//! Extraction prompt and parsing of the model's JSON reply

use serde_json::Value;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::types::ExtractedSlots;

use super::locations::{normalize_location, CANONICAL_LOCATIONS};

/// System persona for the extraction call
pub const EXTRACTION_PERSONA: &str = "Bạn là trợ lý trích xuất thông tin.";

static EXTRACTION_INSTRUCTIONS: LazyLock<String> = LazyLock::new(|| {
    format!(
        r#"Bạn là một trợ lý thông minh, nhiệm vụ là trích xuất độ tuổi tối thiểu (minAge), độ tuổi tối đa (maxAge), và địa điểm (location) từ câu hỏi của người dùng. Trả lời **CHỈ DƯỚI DẠNG JSON** với ba trường: "minAge", "maxAge", và "location". KHÔNG trả về bất kỳ nội dung nào ngoài JSON (không giải thích, không code, không văn bản khác).

QUY TẮC:
- Nếu câu hỏi có "trên X tuổi" hoặc "lớn hơn X tuổi", đặt "minAge": X (số nguyên), "maxAge": null.
- Nếu câu hỏi có "dưới X tuổi" hoặc "nhỏ hơn X tuổi", đặt "minAge": null, "maxAge": X (số nguyên).
- Nếu câu hỏi có "từ X đến Y tuổi" hoặc "trong khoảng X đến Y tuổi", đặt "minAge": X (số nguyên), "maxAge": Y (số nguyên).
- Nếu không có thông tin độ tuổi, đặt "minAge": null, "maxAge": null.
- Chỉ trích xuất **tên địa điểm CỤ THỂ** từ danh sách sau: {locations}.
- Chuẩn hóa tên địa điểm theo danh sách trên (ví dụ: "TP HCM", "Sài Gòn", "HCM" -> "TP Hồ Chí Minh").
- Nếu địa điểm không nằm trong danh sách hoặc không được nêu rõ (ví dụ: "gần đây", "ở ngoài"), đặt "location": null.
- KHÔNG suy diễn hoặc đoán địa điểm. Chỉ trích xuất nếu tên địa điểm được nêu rõ trong câu hỏi.
- Tuổi phải là số nguyên (int). Sử dụng null cho các trường không có thông tin.

VÍ DỤ:
- "Tìm người trên 17 tuổi" -> {{"minAge": 17, "maxAge": null, "location": null}}
- "Tìm người dưới 20 tuổi ở Hà Nội" -> {{"minAge": null, "maxAge": 20, "location": "Hà Nội"}}
- "Filter Tìm người trong khoảng 10 đến 30 tuổi sống tại TP HCM" -> {{"minAge": 10, "maxAge": 30, "location": "TP Hồ Chí Minh"}}
- "Tôi nên nhắn gì đầu tiên?" -> {{"minAge": null, "maxAge": null, "location": null}}
- "Gợi ý địa điểm hẹn hò gần đây?" -> {{"minAge": null, "maxAge": null, "location": null}}"#,
        locations = CANONICAL_LOCATIONS.join(", ")
    )
});

/// Full user prompt for one question
pub fn extraction_prompt(question: &str) -> String {
    format!(
        "{}\n\nCâu hỏi: {}\n\nTrả lời:",
        EXTRACTION_INSTRUCTIONS.as_str(),
        question
    )
}

/// Parse the raw model reply into slots
///
/// Only the text between the first `{` and the last `}` is parsed. Ages must
/// coerce to integers; a location is kept only if it normalizes to a
/// canonical region.
pub fn parse_slots(raw: &str) -> Result<ExtractedSlots> {
    let json = json_object_span(raw)
        .ok_or_else(|| Error::SlotParse(format!("no JSON object in reply: {:?}", raw)))?;

    let value: Value = serde_json::from_str(json)
        .map_err(|e| Error::SlotParse(format!("invalid JSON: {}", e)))?;

    let min_age = coerce_age(value.get("minAge"), "minAge")?;
    let max_age = coerce_age(value.get("maxAge"), "maxAge")?;

    let location = match value.get("location").and_then(Value::as_str) {
        Some(raw_location) if !raw_location.trim().is_empty() => {
            let normalized = normalize_location(raw_location);
            match normalized {
                Some(canonical) => {
                    tracing::debug!("Normalized location '{}' to '{}'", raw_location, canonical)
                }
                None => tracing::debug!("Location '{}' is not a known region", raw_location),
            }
            normalized.map(str::to_string)
        }
        _ => None,
    };

    Ok(ExtractedSlots {
        min_age,
        max_age,
        location,
    })
}

fn json_object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn coerce_age(value: Option<&Value>, field: &str) -> Result<Option<i64>> {
    let invalid = || Error::SlotParse(format!("{} is not an integer: {:?}", field, value));

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i))
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(Some(f.trunc() as i64)),
                    _ => Err(invalid()),
                }
            }
        }
        Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}
