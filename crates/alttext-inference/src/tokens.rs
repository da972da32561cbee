//! Decoding raw model output into a clean caption.
//!
//! Vision models sometimes leak tokenizer control markers or reasoning
//! blocks into their text output. These are removed before a caption is
//! handed to the translator or the client.

/// Control markers emitted by common tokenizers (BERT, Llama, GPT, ChatML).
const CONTROL_TOKENS: &[&str] = &[
    "<|endoftext|>",
    "<|im_start|>",
    "<|im_end|>",
    "<|eot_id|>",
    "<|end|>",
    "<image>",
    "<pad>",
    "<unk>",
    "<s>",
    "</s>",
    "[CLS]",
    "[SEP]",
    "[PAD]",
    "[UNK]",
];

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";

/// Strip reasoning blocks and control tokens, then collapse whitespace.
///
/// An unclosed `<think>` block swallows the rest of the text, which leaves
/// an empty caption that callers must treat as a failure.
///
/// # Examples
///
/// ```
/// use alttext_inference::strip_control_tokens;
///
/// let raw = "<s> a dog  running on\n the beach </s>";
/// assert_eq!(strip_control_tokens(raw), "a dog running on the beach");
/// ```
pub fn strip_control_tokens(raw: &str) -> String {
    let without_thinking = strip_thinking(raw);

    let mut text = without_thinking;
    for token in CONTROL_TOKENS {
        if text.contains(token) {
            text = text.replace(token, " ");
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_thinking(raw: &str) -> String {
    let mut answer = String::with_capacity(raw.len());
    let mut current_pos = 0;

    while current_pos < raw.len() {
        let Some(think_start) = raw[current_pos..].find(THINK_OPEN) else {
            answer.push_str(&raw[current_pos..]);
            break;
        };

        let absolute_start = current_pos + think_start;
        answer.push_str(&raw[current_pos..absolute_start]);
        current_pos = absolute_start + THINK_OPEN.len();

        match raw[current_pos..].find(THINK_CLOSE) {
            Some(think_end) => current_pos += think_end + THINK_CLOSE.len(),
            // Unclosed block: the remainder is reasoning, not caption
            None => break,
        }
    }

    answer
}
