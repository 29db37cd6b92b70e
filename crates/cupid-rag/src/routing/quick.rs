//! Canned replies for greetings and small talk

/// Look up a canned reply; the question is trimmed and lowercased first
pub fn quick_response(question: &str) -> Option<&'static str> {
    let reply = match question.trim().to_lowercase().as_str() {
        "chào" => "Chào bạn! Hôm nay bạn thấy thế nào? 😊",
        "cảm ơn" => "Không có gì, mình luôn sẵn sàng giúp bạn! 😊",
        "hi" => "Hi! Rất vui được trò chuyện với bạn! 😄",
        "hello" => "Hello! Bạn khỏe không? 😊",
        "tạm biệt" => "Tạm biệt! Hẹn gặp lại bạn nhé. 👋",
        "trời hôm nay đẹp nhỉ" => "Ừ, trời đẹp thật! Bạn định làm gì hôm nay? 😊",
        _ => return None,
    };
    Some(reply)
}
