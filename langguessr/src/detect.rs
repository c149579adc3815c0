use whatlang::Lang;

/// Texts shorter than this are too ambiguous to classify.
pub const MIN_LENGTH: usize = 10;

/// Guesses the language of `text` from its trigram profile. Returns `None`
/// when the text is too short or the classifier has no answer.
pub fn detect_language(text: &str) -> Option<Lang> {
    let text = text.trim();
    if text.chars().count() < MIN_LENGTH {
        tracing::debug!(length = text.chars().count(), "text too short to classify");
        return None;
    }

    let info = whatlang::detect(text)?;
    tracing::debug!(
        lang = info.lang().code(),
        script = ?info.script(),
        confidence = info.confidence(),
        reliable = info.is_reliable(),
        "detected language"
    );

    Some(info.lang())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_english() {
        let lang = detect_language("The quick brown fox jumps over the lazy dog near the river bank.");

        assert_eq!(lang, Some(Lang::Eng));
        assert_eq!(lang.unwrap().eng_name(), "English");
    }

    #[test]
    fn detects_spanish() {
        let lang = detect_language(
            "Hola, me llamo Juan y vivo en una casa grande cerca de la playa con mi familia.",
        );

        assert_eq!(lang, Some(Lang::Spa));
    }

    #[test]
    fn short_text_is_undetermined() {
        assert_eq!(detect_language("hi there"), None);
        assert_eq!(detect_language("   "), None);
    }
}
