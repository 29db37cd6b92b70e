//! Keyword-rule category classifier
//!
//! Rules are checked in a fixed order and the first hit wins. Keyword sets
//! overlap on purpose (`chú ý` is both a caution word and part of a meeting
//! phrase), so the order below must not be rearranged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic label predicted for a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    MeetingSafety,
    ConversationStart,
    CommunicationDating,
    RelationshipContinuation,
}

impl Category {
    /// Category label as it appears in the corpus markers
    pub fn label(&self) -> &'static str {
        match self {
            Category::MeetingSafety => "Bảo mật & An toàn khi hẹn hò",
            Category::ConversationStart => "Bắt đầu cuộc trò chuyện",
            Category::CommunicationDating => "Giao tiếp & Hẹn hò",
            Category::RelationshipContinuation => "Kết thúc hoặc tiếp tục mối quan hệ",
        }
    }

    /// Whether a document's category label belongs to this category
    pub fn matches(&self, label: &str) -> bool {
        self.label() == label
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const MEETING_SAFETY_PHRASES: &[&str] = &[
    "an toàn khi gặp",
    "gặp mặt lần đầu",
    "chú ý khi gặp",
    "chỗ nào gặp",
    "gặp ở đâu",
    "an toàn lần đầu",
    "gặp mặt an toàn",
];

const ADVICE_WORDS: &[&str] = &[
    "chú ý",
    "an toàn",
    "nên làm gì",
    "làm sao",
    "cẩn thận",
    "tránh",
    "lưu ý",
    "đề phòng",
];

const GENERAL_SAFETY_WORDS: &[&str] = &[
    "bảo mật",
    "tin tưởng",
    "số điện thoại",
    "lừa đảo",
    "giả mạo",
    "báo cáo",
    "chặn",
    "block",
    "riêng tư",
    "cẩn trọng",
    " inf cá nhân",
];

const CONVERSATION_START_WORDS: &[&str] = &[
    "đầu tiên",
    "mới ghép đôi",
    "nhắn gì",
    "mở lời",
    "bắt đầu",
    "bắt chuyện",
    "làm quen",
    "chào hỏi",
];

const COMMUNICATION_WORDS: &[&str] = &[
    "trò chuyện",
    "hẹn hò",
    "gặp mặt",
    "rủ đi",
    "thú vị",
    "nhắn tin",
    "nói chuyện",
    "duy trì",
    "hấp dẫn",
    "phản hồi chậm",
    "chậm",
    "nhắn tin chậm",
    "rep chậm",
    "đọc nhưng không trả lời",
    "seen nhưng không rep",
    "chờ tin nhắn",
    "mất hứng thú",
    "bị lơ",
    "bị ngó lơ",
];

const RELATIONSHIP_WORDS: &[&str] = &[
    "tiếp tục",
    "kết thúc",
    "chia tay",
    "thích nhau",
    "tiến triển",
    "nghiêm túc",
    "không hợp",
    "dừng lại",
];

const OPEN_UP_WORDS: &[&str] = &[
    "kể nhiều",
    "kể thêm",
    "mở lòng",
    "chia sẻ thêm",
    "kể chuyện",
    "kể về",
    "tâm sự",
    "nói thêm",
];

/// Ordered keyword rules
pub struct CategoryClassifier;

impl CategoryClassifier {
    /// Predict the category of a question, `None` when no rule fires
    pub fn classify(question: &str) -> Option<Category> {
        let q = question.to_lowercase();

        let (category, rule) = if contains_any(&q, MEETING_SAFETY_PHRASES) {
            (Category::MeetingSafety, "meeting safety phrase")
        } else if mentions_meeting(&q) && contains_any(&q, ADVICE_WORDS) {
            (Category::MeetingSafety, "meeting word + advice word")
        } else if contains_any(&q, GENERAL_SAFETY_WORDS) {
            (Category::MeetingSafety, "general safety")
        } else if contains_any(&q, CONVERSATION_START_WORDS) {
            (Category::ConversationStart, "conversation start")
        } else if contains_any(&q, COMMUNICATION_WORDS) {
            (Category::CommunicationDating, "communication/dating")
        } else if contains_any(&q, RELATIONSHIP_WORDS) {
            (Category::RelationshipContinuation, "end/continue relationship")
        } else if contains_any(&q, OPEN_UP_WORDS) {
            (Category::ConversationStart, "open up")
        } else {
            tracing::debug!("No category rule matched");
            return None;
        };

        tracing::debug!("Classified as {:?} by {} rule", category, rule);
        Some(category)
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

// "gặp" as its own word, or the compound "gặp mặt"
fn mentions_meeting(q: &str) -> bool {
    q.contains("gặp mặt") || q.contains(" gặp ") || q.starts_with("gặp ") || q.ends_with(" gặp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_safety_phrase() {
        assert_eq!(
            CategoryClassifier::classify("Gặp mặt lần đầu nên mặc gì?"),
            Some(Category::MeetingSafety)
        );
    }

    #[test]
    fn test_meeting_plus_advice() {
        assert_eq!(
            CategoryClassifier::classify("Khi đi gặp bạn ấy cần lưu ý gì"),
            Some(Category::MeetingSafety)
        );
        // advice word alone is not enough
        assert_eq!(CategoryClassifier::classify("lưu ý gì"), None);
    }

    #[test]
    fn test_priority_meeting_safety_over_conversation_start() {
        // "bắt đầu" alone would be ConversationStart
        assert_eq!(
            CategoryClassifier::classify("Bắt đầu hẹn, gặp ở đâu thì an toàn?"),
            Some(Category::MeetingSafety)
        );
        assert_eq!(
            CategoryClassifier::classify("bắt đầu thế nào"),
            Some(Category::ConversationStart)
        );
    }

    #[test]
    fn test_general_safety() {
        assert_eq!(
            CategoryClassifier::classify("Có nên cho số điện thoại không?"),
            Some(Category::MeetingSafety)
        );
    }

    #[test]
    fn test_communication_slow_reply() {
        assert_eq!(
            CategoryClassifier::classify("Họ rep chậm quá"),
            Some(Category::CommunicationDating)
        );
    }

    #[test]
    fn test_relationship_and_open_up() {
        assert_eq!(
            CategoryClassifier::classify("Có nên chia tay không"),
            Some(Category::RelationshipContinuation)
        );
        assert_eq!(
            CategoryClassifier::classify("Làm sao để họ tâm sự"),
            Some(Category::ConversationStart)
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(CategoryClassifier::classify("xin chào, bạn khỏe không"), None);
        assert_eq!(CategoryClassifier::classify(""), None);
    }

    #[test]
    fn test_case_insensitive_and_idempotent() {
        let q = "NHẮN GÌ ĐẦU TIÊN?";
        let first = CategoryClassifier::classify(q);
        assert_eq!(first, Some(Category::ConversationStart));
        for _ in 0..3 {
            assert_eq!(CategoryClassifier::classify(q), first);
        }
    }

    #[test]
    fn test_labels_match_corpus() {
        assert!(Category::CommunicationDating.matches("Giao tiếp & Hẹn hò"));
        assert!(!Category::MeetingSafety.matches("Giao tiếp & Hẹn hò"));
    }
}
