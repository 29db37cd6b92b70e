//! Prompt templates for answer synthesis

use crate::types::SearchHit;

/// Reply used whenever the model cannot ground an answer
pub const INSUFFICIENT_INFO: &str =
    "Mình chưa có đủ thông tin để trả lời chính xác, bạn thử hỏi thêm nhé!";

/// System persona for the synthesis call
pub const SYNTHESIS_PERSONA: &str = "Bạn là trợ lý hỗ trợ giao tiếp hẹn hò.";

const RAG_INSTRUCTIONS: &str = r#"Bạn là trợ lý hỗ trợ giao tiếp hẹn hò, nhiệm vụ là trả lời câu hỏi dựa trên context chứa nhiều cặp Q/A liên quan.

QUY TRÌNH BẮT BUỘC:
1. Context chứa các cặp Q/A (định dạng: Q: ... | A: ...).
2. Đọc và tổng hợp thông tin từ TẤT CẢ các cặp Q/A trong context để tạo câu trả lời phù hợp nhất với câu hỏi.
3. Nếu có cặp Q/A khớp gần với câu hỏi (theo ngữ nghĩa), ưu tiên sử dụng ý chính từ câu trả lời đó, nhưng kết hợp với các cặp khác nếu phù hợp.
4. Nếu context chỉ có một cặp Q/A, sử dụng câu trả lời đó nhưng diễn đạt tự nhiên hơn.
5. Nếu không có cặp Q/A phù hợp hoặc context trống, trả về: "Mình chưa có đủ thông tin để trả lời chính xác, bạn thử hỏi thêm nhé!"
6. Câu trả lời phải tự nhiên, ngắn gọn, đúng ngữ cảnh hẹn hò, thân thiện, không lặp lại câu hỏi, và không chứa ký tự thừa.
7. KHÔNG dịch câu hỏi hoặc trả lời sang tiếng Anh, giữ nguyên tiếng Việt.

VÍ DỤ:
Context:
Q: Tôi nên nhắn gì nếu họ trả lời chậm? | A: Đừng nhắn dồn dập. Chờ khoảng 1-2 ngày, sau đó nhắn lại nhẹ nhàng: "Hey bạn, cuối tuần có gì vui không?". Nếu họ vẫn không trả lời, có thể họ không hứng thú.
Q: Làm sao để nhắn lại sau vài ngày mà không kỳ? | A: Nhắn tự nhiên, không tỏ vẻ hờn dỗi. "Hey bạn, cuối tuần vui không?" hoặc "Sực nhớ bữa mình đang nói về [chủ đề]...".
Q: Nếu họ trả lời ngắn, tôi nên làm gì? | A: Có thể họ đang bận hoặc không biết nói gì. Thử đặt một câu hỏi mở hơn, hoặc chia sẻ gì đó về bạn trước để khơi gợi.

Câu hỏi: Nếu đối phương trả lời tin nhắn chậm thì sao?
Trả lời: Nếu đối phương trả lời chậm, hãy kiên nhẫn chờ 1-2 ngày, rồi nhắn lại nhẹ nhàng như: "Hey bạn, cuối tuần có gì vui không?". Nếu họ trả lời ngắn hoặc không trả lời, thử đặt câu hỏi mở hơn để khơi gợi, nhưng nếu tình hình không cải thiện, có thể họ không thực sự quan tâm."#;

/// Prompt builder for synthesis
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render the first `top_n` complete hits as `Q: … | A: …` lines separated
    /// by blank lines
    pub fn build_context(hits: &[&SearchHit], top_n: usize) -> String {
        hits.iter()
            .take(top_n)
            .filter(|hit| hit.document.is_complete())
            .map(|hit| hit.document.to_context_line())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Full synthesis prompt: instructions, context, then the question
    pub fn build_rag_prompt(question: &str, context: &str) -> String {
        format!(
            "{}\n\nContext:\n{}\n\nCâu hỏi: {}\n\nTrả lời: ",
            RAG_INSTRUCTIONS, context, question
        )
    }

    /// The model output is the canned insufficient-information reply
    pub fn is_insufficient(text: &str) -> bool {
        text.trim().to_lowercase() == INSUFFICIENT_INFO.to_lowercase()
    }
}
