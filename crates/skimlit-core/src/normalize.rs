//! Number normalization for classifier input.
//!
//! Models trained on PubMed RCT see every numeric literal replaced with `@`,
//! so inference input must be rewritten the same way. A maximal run of
//! decimal digits (Unicode `Nd`, so `٣` and `３` count too) collapses to a
//! single placeholder; everything else passes through untouched.
//!
//! # Properties
//!
//! - Digit-free text is returned unchanged.
//! - The output never contains a decimal digit.
//! - Applying it twice equals applying it once.

use std::sync::LazyLock;

use regex::Regex;

/// Symbol substituted for each run of digits.
pub const NUMBER_PLACEHOLDER: &str = "@";

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit-run pattern is valid"));

/// Replace every maximal run of decimal digits with [`NUMBER_PLACEHOLDER`].
///
/// `"In 2020, 50 patients were enrolled."` → `"In @, @ patients were enrolled."`
///
/// Decimal points and signs are not digits: `"3.5"` becomes `"@.@"`.
pub fn replace_numbers(text: &str) -> String {
    DIGIT_RUN
        .replace_all(text, NUMBER_PLACEHOLDER)
        .into_owned()
}

/// True if `text` contains at least one decimal digit.
pub fn contains_numbers(text: &str) -> bool {
    DIGIT_RUN.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_year_and_count() {
        assert_eq!(
            replace_numbers("In 2020, 50 patients were enrolled."),
            "In @, @ patients were enrolled."
        );
    }

    #[test]
    fn digit_free_text_unchanged() {
        let inputs = [
            "",
            "No numbers here.",
            "Patients (n=@) were randomised.",
            "Ünïcödé — text with punctuation!?",
        ];
        for t in inputs {
            assert_eq!(replace_numbers(t), t);
        }
    }

    #[test]
    fn output_has_no_digits() {
        let inputs = [
            "p < 0.001",
            "12.5 mg/kg twice daily for 14 days",
            "Phase 3 trial NCT01234567",
            "٣ full-width ３４ digits",
            "1",
        ];
        for t in inputs {
            let out = replace_numbers(t);
            assert!(
                !out.chars().any(|c| c.is_ascii_digit()),
                "digits left in {out:?}"
            );
            assert!(!contains_numbers(&out), "Nd digits left in {out:?}");
        }
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "In 2020, 50 patients were enrolled.",
            "95% CI 1.2-3.4",
            "no digits",
        ];
        for t in inputs {
            let once = replace_numbers(t);
            assert_eq!(replace_numbers(&once), once);
        }
    }

    #[test]
    fn decimals_and_ranges_keep_separators() {
        assert_eq!(replace_numbers("3.5"), "@.@");
        assert_eq!(replace_numbers("10-20%"), "@-@%");
        assert_eq!(replace_numbers("(n = 120)"), "(n = @)");
    }

    #[test]
    fn adjacent_letters_are_preserved() {
        assert_eq!(replace_numbers("COVID19 and H1N1"), "COVID@ and H@N@");
    }

    #[test]
    fn contains_numbers_detects_digits() {
        assert!(contains_numbers("week 12"));
        assert!(!contains_numbers("week @"));
    }
}
