//! Lead scoring: a sales-qualification proxy for inbound contact requests.
//!
//! The score is purely additive over which fields were filled in and how
//! much the doctor wrote, so the same request always scores the same.

use brand_core::ContactRequest;

pub const BASE_SCORE: u32 = 10;
pub const MAX_SCORE: u32 = 70;

const NAME_POINTS: u32 = 5;
const SPECIALTY_POINTS: u32 = 10;
// A registration number is the strongest signal of a real prescriber.
const CRM_POINTS: u32 = 15;
const CLINIC_POINTS: u32 = 10;

const DETAILED_QUESTION_CHARS: usize = 50;
const LONG_QUESTION_CHARS: usize = 150;
const QUESTION_POINTS: u32 = 10;

/// Score a contact request. Always in `[BASE_SCORE, MAX_SCORE]`.
pub fn lead_score(contact: &ContactRequest) -> u32 {
    let mut score = BASE_SCORE;

    if contact.has_name() {
        score += NAME_POINTS;
    }
    if contact.has_specialty() {
        score += SPECIALTY_POINTS;
    }
    if contact.has_crm() {
        score += CRM_POINTS;
    }
    if contact.has_clinic() {
        score += CLINIC_POINTS;
    }

    let question_length = contact.question_length();
    if question_length > DETAILED_QUESTION_CHARS {
        score += QUESTION_POINTS;
    }
    if question_length > LONG_QUESTION_CHARS {
        score += QUESTION_POINTS;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, specialty: &str, crm: &str, clinic: &str, question: &str) -> ContactRequest {
        ContactRequest {
            name: name.into(),
            specialty: specialty.into(),
            crm: crm.into(),
            clinic: clinic.into(),
            question: question.into(),
        }
    }

    #[test]
    fn test_empty_request_scores_base() {
        assert_eq!(lead_score(&contact("", "", "", "", "")), BASE_SCORE);
    }

    #[test]
    fn test_all_fields_with_detailed_question() {
        let question = "q".repeat(60);
        let score = lead_score(&contact("A", "B", "C", "D", &question));
        assert_eq!(score, 10 + 5 + 10 + 15 + 10 + 10);
    }

    #[test]
    fn test_maximum_score() {
        let question = "q".repeat(151);
        assert_eq!(lead_score(&contact("A", "B", "C", "D", &question)), MAX_SCORE);
    }

    #[test]
    fn test_question_thresholds_are_strict() {
        assert_eq!(lead_score(&contact("", "", "", "", &"q".repeat(50))), 10);
        assert_eq!(lead_score(&contact("", "", "", "", &"q".repeat(51))), 20);
        assert_eq!(lead_score(&contact("", "", "", "", &"q".repeat(150))), 20);
        assert_eq!(lead_score(&contact("", "", "", "", &"q".repeat(151))), 30);
    }

    #[test]
    fn test_question_length_counts_characters() {
        // 51 accented characters are more than 51 bytes but still one bonus.
        let question = "é".repeat(51);
        assert_eq!(lead_score(&contact("", "", "", "", &question)), 20);
    }

    #[test]
    fn test_emoji_count_as_two_units() {
        // 26 emoji are 52 UTF-16 units, past the detailed-question mark.
        let question = "💊".repeat(26);
        assert_eq!(lead_score(&contact("", "", "", "", &question)), 20);
    }

    #[test]
    fn test_crm_alone() {
        assert_eq!(lead_score(&contact("", "", "123456-SP", "", "Dose?")), 25);
    }

    #[test]
    fn test_deterministic_and_bounded() {
        let samples = [
            contact("", "", "", "", ""),
            contact("Dra. Lima", "", "", "", "Interações?"),
            contact("", "Cardiologia", "", "Clínica Sul", &"x".repeat(80)),
            contact("Dr. Souza", "Endocrinologia", "98765", "Hospital", &"y".repeat(200)),
        ];
        for sample in &samples {
            let first = lead_score(sample);
            assert_eq!(first, lead_score(sample));
            assert!((BASE_SCORE..=MAX_SCORE).contains(&first));
        }
    }
}
