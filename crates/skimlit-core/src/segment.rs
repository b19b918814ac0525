//! Sentence segmentation for abstracts.
//!
//! Splits an abstract into ordered, sentence-like lines. Physical line breaks
//! always separate units (abstracts pasted from PubMed often have one
//! sentence per line). Within a physical line a sentence ends at `.`, `!` or
//! `?`, optionally followed by closing quotes or brackets, when whitespace
//! and a sentence-starting character come next.
//!
//! # Boundary rules
//!
//! - Starters: uppercase letters, digits, the `@` number placeholder, and
//!   opening quotes or brackets.
//! - Decimals (`0.05`) never split: a boundary needs whitespace.
//! - Known abbreviations (`e.g.`, `et al.`, `vs.`, `Fig.`) and initialisms
//!   (`U.S.`) never end a sentence.

/// Abbreviations whose trailing period does not end a sentence (lowercase).
const ABBREVIATIONS: &[&str] = &[
    "e.g.", "i.e.", "al.", "vs.", "cf.", "fig.", "figs.", "eq.", "ref.", "refs.", "no.", "nos.",
    "vol.", "approx.", "resp.", "dr.", "mr.", "mrs.", "ms.", "prof.", "st.", "inc.", "ltd.",
    "jr.", "sr.", "dept.", "univ.", "ca.",
];

/// Split `text` into trimmed, non-empty lines in reading order.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().flat_map(split_sentences).collect()
}

fn split_sentences(line: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let (byte_idx, c) = chars[i];
        if !is_terminator(c) {
            i += 1;
            continue;
        }

        // Absorb repeated terminators ("?!", "...") and closing punctuation.
        let mut end = i + 1;
        while end < chars.len() && (is_terminator(chars[end].1) || is_closer(chars[end].1)) {
            end += 1;
        }
        let mut next = end;
        while next < chars.len() && chars[next].1.is_whitespace() {
            next += 1;
        }

        let is_boundary = next > end
            && next < chars.len()
            && starts_sentence(chars[next].1)
            && !(c == '.' && is_abbreviation(&line[start..=byte_idx]));

        if is_boundary {
            push_trimmed(&mut out, &line[start..chars[end].0]);
            start = chars[next].0;
            i = next;
        } else {
            i = end;
        }
    }

    push_trimmed(&mut out, &line[start..]);
    out
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '”' | '’')
}

fn starts_sentence(c: char) -> bool {
    c.is_uppercase()
        || c.is_numeric()
        || matches!(c, '@' | '(' | '[' | '"' | '\'' | '“' | '‘')
}

/// Does the last word of `piece` (which ends with `.`) look like an abbreviation?
fn is_abbreviation(piece: &str) -> bool {
    let word = piece
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(['(', '[', '"', '\'', '“', '‘']);
    let lower = word.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str()) || is_initialism(word)
}

/// `U.S.`, `i.v.`: two or more single letters each followed by a period.
fn is_initialism(word: &str) -> bool {
    let mut pairs = 0;
    let mut chars = word.chars();
    loop {
        match (chars.next(), chars.next()) {
            (None, _) => return pairs >= 2,
            (Some(l), Some('.')) if l.is_alphabetic() => pairs += 1,
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_sentences() {
        assert_eq!(
            split_lines("We enrolled patients. Outcomes improved! Was it safe? Yes."),
            vec![
                "We enrolled patients.",
                "Outcomes improved!",
                "Was it safe?",
                "Yes."
            ]
        );
    }

    #[test]
    fn decimals_do_not_split() {
        assert_eq!(
            split_lines("Mean age was 54.3 years (p < 0.05). Follow-up lasted @ weeks."),
            vec![
                "Mean age was 54.3 years (p < 0.05).",
                "Follow-up lasted @ weeks."
            ]
        );
    }

    #[test]
    fn abbreviations_do_not_split() {
        let text = "Dressings (e.g. UrgoClean) were compared with Aquacel vs. Control as in Smith et al. The trial ran in the U.S. Results were mixed.";
        assert_eq!(
            split_lines(text),
            vec![
                "Dressings (e.g. UrgoClean) were compared with Aquacel vs. Control as in Smith et al. The trial ran in the U.S. Results were mixed."
            ]
        );
    }

    #[test]
    fn lowercase_continuation_does_not_split() {
        assert_eq!(
            split_lines("Doses were approx. twice daily. It was done."),
            vec!["Doses were approx. twice daily.", "It was done."]
        );
        assert_eq!(
            split_lines("The ratio was 3:1 in arm a. and arm b."),
            vec!["The ratio was 3:1 in arm a. and arm b."]
        );
    }

    #[test]
    fn placeholder_and_digits_start_sentences() {
        assert_eq!(
            split_lines("Patients were randomised. @ completed the study. 12 withdrew."),
            vec![
                "Patients were randomised.",
                "@ completed the study.",
                "12 withdrew."
            ]
        );
    }

    #[test]
    fn closing_quotes_stay_with_sentence() {
        assert_eq!(
            split_lines("They called it \"safe.\" Others disagreed (strongly.) Then it ended."),
            vec![
                "They called it \"safe.\"",
                "Others disagreed (strongly.)",
                "Then it ended."
            ]
        );
    }

    #[test]
    fn newlines_separate_units() {
        let text = "BACKGROUND: leg ulcers are common\n\nMETHODS: a randomised trial\r\nRESULTS: healing improved";
        assert_eq!(
            split_lines(text),
            vec![
                "BACKGROUND: leg ulcers are common",
                "METHODS: a randomised trial",
                "RESULTS: healing improved"
            ]
        );
    }

    #[test]
    fn pubmed_rct_spacing_splits() {
        let text = "in the debridement stage . A non-comparative study was done .";
        assert_eq!(
            split_lines(text),
            vec!["in the debridement stage .", "A non-comparative study was done ."]
        );
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(split_lines("").is_empty());
        assert!(split_lines("  \n \n").is_empty());
    }

    #[test]
    fn text_without_terminator_is_one_line() {
        assert_eq!(split_lines("  no punctuation at all  "), vec!["no punctuation at all"]);
    }

    #[test]
    fn initialism_detection() {
        assert!(is_initialism("U.S."));
        assert!(is_initialism("i.v."));
        assert!(!is_initialism("A."));
        assert!(!is_initialism("stage."));
        assert!(!is_initialism("0.05."));
    }
}
