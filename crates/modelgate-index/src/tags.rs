//! Tag derivation.
//!
//! Tags are a pure function of (model name, provider): the same inputs
//! always yield the same tag set, which keeps rebuilds idempotent. The
//! name is tokenized cumulatively, one separator at a time, so both the
//! intermediate compounds (`qwen-72b`) and the final fragments (`qwen`,
//! `72b`) become queryable tags.

use std::collections::BTreeSet;

/// Separators applied in turn when tokenizing a model name.
const SEPARATORS: [char; 8] = [':', '/', '@', '-', '_', ',', '.', ' '];

const FREE_MARKERS: [&str; 3] = ["free", "gratis", "免费"];
const VISION_MARKERS: [&str; 4] = ["vision", "visual", "image", "multimodal"];
const CODE_MARKERS: [&str; 4] = ["code", "coder", "coding", "program"];

/// Derive the tag set for one model offering.
///
/// The model name is lower-cased and split cumulatively on each separator;
/// tokens shorter than two characters are discarded. The lower-cased
/// provider name is always a tag, plus the heuristic tags `free`, `vision`
/// and `code` when the name suggests them.
#[must_use]
pub fn derive_tags(model_name: &str, provider: &str) -> BTreeSet<String> {
    let lowered = model_name.to_lowercase();
    let mut tags = BTreeSet::new();

    insert_token(&mut tags, &lowered);
    let mut fragments = vec![lowered.clone()];
    for sep in SEPARATORS {
        fragments = fragments
            .iter()
            .flat_map(|fragment| fragment.split(sep))
            .map(str::to_string)
            .collect();
        for fragment in &fragments {
            insert_token(&mut tags, fragment);
        }
    }

    let provider = provider.trim().to_lowercase();
    if !provider.is_empty() {
        tags.insert(provider);
    }

    if FREE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        tags.insert("free".to_string());
    }
    if VISION_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        tags.insert("vision".to_string());
    }
    if CODE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        tags.insert("code".to_string());
    }

    tags
}

/// Single characters are noise ("v", "b", stray digits).
fn insert_token(tags: &mut BTreeSet<String>, token: &str) {
    if token.chars().count() >= 2 {
        tags.insert(token.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has(tags: &BTreeSet<String>, tag: &str) -> bool {
        tags.contains(tag)
    }

    #[test]
    fn test_name_tokenization() {
        let tags = derive_tags("gpt-4o-mini", "openai");
        assert!(has(&tags, "gpt-4o-mini"));
        assert!(has(&tags, "gpt"));
        assert!(has(&tags, "4o"));
        assert!(has(&tags, "mini"));
        assert!(has(&tags, "openai"));
    }

    #[test]
    fn test_cumulative_split_keeps_compounds() {
        let tags = derive_tags("qwen/qwen-72b:free", "openrouter");
        // Compounds from earlier separator passes survive
        assert!(has(&tags, "qwen/qwen-72b:free"));
        assert!(has(&tags, "qwen-72b"));
        assert!(has(&tags, "qwen"));
        assert!(has(&tags, "72b"));
        assert!(has(&tags, "free"));
    }

    #[test]
    fn test_short_tokens_discarded() {
        let tags = derive_tags("llama-3.1-8b-instant", "groq");
        assert!(has(&tags, "llama"));
        assert!(has(&tags, "8b"));
        assert!(has(&tags, "instant"));
        // "3" and "1" are single characters
        assert!(!has(&tags, "3"));
        assert!(!has(&tags, "1"));
    }

    #[test]
    fn test_lowercasing() {
        let tags = derive_tags("GPT-4o-Mini", "OpenAI");
        assert!(has(&tags, "gpt"));
        assert!(has(&tags, "mini"));
        assert!(has(&tags, "openai"));
        assert!(!tags.iter().any(|t| t.chars().any(char::is_uppercase)));
    }

    #[test]
    fn test_free_heuristic() {
        assert!(has(&derive_tags("qwen-7b-free", "siliconflow"), "free"));
        assert!(has(&derive_tags("llama-gratis", "x"), "free"));
        assert!(has(&derive_tags("glm-4-免费", "zhipu"), "free"));
        assert!(!has(&derive_tags("gpt-4o", "openai"), "free"));
    }

    #[test]
    fn test_vision_heuristic() {
        assert!(has(&derive_tags("qwen-vl-vision", "qwen"), "vision"));
        assert!(has(&derive_tags("some-visual-7b", "x"), "vision"));
        assert!(has(&derive_tags("image-gen-2", "x"), "vision"));
        assert!(has(&derive_tags("llava-multimodal", "x"), "vision"));
        assert!(!has(&derive_tags("gpt-4o-mini", "openai"), "vision"));
    }

    #[test]
    fn test_code_heuristic() {
        assert!(has(&derive_tags("qwen-coder-32b", "qwen"), "code"));
        assert!(has(&derive_tags("codellama-13b", "meta"), "code"));
        assert!(has(&derive_tags("coding-helper", "x"), "code"));
        assert!(has(&derive_tags("program-synth", "x"), "code"));
    }

    #[test]
    fn test_empty_provider_adds_no_tag() {
        let tags = derive_tags("gpt-4o", "");
        assert!(has(&tags, "gpt"));
        assert!(!has(&tags, ""));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            derive_tags("deepseek-coder-v2:free", "deepseek"),
            derive_tags("deepseek-coder-v2:free", "deepseek"),
        );
    }
}
