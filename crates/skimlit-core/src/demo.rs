/// Demo abstract offered on the start page: a randomised trial comparing
/// a micro-adherent absorbent dressing (UrgoClean) with a hydrofiber
/// dressing (Aquacel) for venous leg ulcers.
pub const DEMO_ABSTRACT: &str = "To evaluate the performance (efficacy, safety and acceptability) of a new \
micro-adherent absorbent dressing (UrgoClean) compared with a hydrofiber dressing (Aquacel) \
in the local management of venous leg ulcers, in the debridement stage. \
A randomised, controlled, open-label, multicentre trial was conducted in hospital and private practice centres. \
Patients with venous or predominantly venous leg ulcers at the sloughy stage were treated with one of the two dressings for six weeks. \
The primary endpoint was the relative reduction of the sloughy tissue area after two weeks of treatment. \
Wound healing rate, local tolerance and acceptability of the dressings were assessed as secondary endpoints. \
A total of 159 patients were recruited and randomised. \
Both dressings produced a comparable reduction of the sloughy tissue area and a similar healing rate at week 6. \
Local tolerance was good in both groups, and the micro-adherent dressing was rated easier to remove. \
The micro-adherent absorbent dressing is an effective alternative for the local debridement of venous leg ulcers.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Abstract;

    #[test]
    fn demo_is_a_valid_abstract() {
        let abs = Abstract::new(DEMO_ABSTRACT).unwrap();
        let lines = abs.lines();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].text.starts_with("To evaluate the performance"));
        assert!(lines[8].text.starts_with("The micro-adherent absorbent dressing"));
    }

    #[test]
    fn demo_lines_cover_input_in_order() {
        let abs = Abstract::new(DEMO_ABSTRACT).unwrap();
        let mut cursor = 0;
        for line in abs.lines() {
            let found = DEMO_ABSTRACT[cursor..]
                .find(&line.text)
                .expect("line appears after the previous one");
            cursor += found + line.text.len();
        }
        assert_eq!(cursor, DEMO_ABSTRACT.len());
    }
}
