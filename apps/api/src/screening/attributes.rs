//! Attribute detection over plain resume text: years of experience and
//! education level.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::submission::EducationLevel;

// `10+ years`, `10 years`, `10-year`. Spelled-out numbers are not recognized.
static YEARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*\+\s*years|(\d+)\s+years|(\d+)-year").expect("years pattern")
});

const PHD_MARKERS: &[&str] = &["phd", "ph.d", "doctorate"];
// Markers are compared against lowercased text, so "Post-graduate" never
// matches. The bare "be" matches inside ordinary words ("member", "number").
const MASTER_MARKERS: &[&str] = &["master", "ms ", "m.sc", "Post-graduate"];
const BACHELOR_MARKERS: &[&str] = &["bachelor", "b.s", "bs ", "under-graduate", "be"];

/// Largest year count mentioned in `text`, or 0 when nothing matches.
/// Counts too large for `u32` saturate to `u32::MAX`.
pub fn find_years_of_experience(text: &str) -> u32 {
    YEARS_RE
        .captures_iter(text)
        .filter_map(|caps| caps.iter().skip(1).flatten().next())
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
        .max()
        .unwrap_or(0)
}

/// Highest-priority education level mentioned: PhD, then Master, then Bachelor.
pub fn find_education(text: &str) -> EducationLevel {
    let text = text.to_lowercase();
    let mentions = |markers: &[&str]| markers.iter().any(|m| text.contains(m));

    if mentions(PHD_MARKERS) {
        EducationLevel::Phd
    } else if mentions(MASTER_MARKERS) {
        EducationLevel::Master
    } else if mentions(BACHELOR_MARKERS) {
        EducationLevel::Bachelor
    } else {
        EducationLevel::NotSpecified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_years_takes_maximum() {
        let text = "2 years at Acme, then 7+ years at Initech and a 3-year contract";
        assert_eq!(find_years_of_experience(text), 7);
    }

    #[test]
    fn test_years_plus_with_spaces() {
        assert_eq!(find_years_of_experience("12 + years of Java"), 12);
    }

    #[test]
    fn test_years_case_insensitive() {
        assert_eq!(find_years_of_experience("Over 4 YEARS in QA"), 4);
    }

    #[test]
    fn test_years_hyphenated() {
        assert_eq!(find_years_of_experience("a 6-year stint"), 6);
    }

    #[test]
    fn test_years_spelled_out_not_recognized() {
        assert_eq!(find_years_of_experience("five years of Go"), 0);
    }

    #[test]
    fn test_years_requires_separator() {
        assert_eq!(find_years_of_experience("5years"), 0);
    }

    #[test]
    fn test_years_none() {
        assert_eq!(find_years_of_experience(""), 0);
    }

    #[test]
    fn test_years_overflow_saturates() {
        assert_eq!(
            find_years_of_experience("99999999999999 years, really 3 years"),
            u32::MAX
        );
    }

    #[test]
    fn test_education_phd_beats_bachelor() {
        let text = "Bachelor of Science, later a PhD in Physics";
        assert_eq!(find_education(text), EducationLevel::Phd);
    }

    #[test]
    fn test_education_master_markers() {
        assert_eq!(find_education("M.Sc. Data Science"), EducationLevel::Master);
        assert_eq!(find_education("Master of Arts"), EducationLevel::Master);
    }

    #[test]
    fn test_education_post_graduate_is_not_master() {
        assert_ne!(
            find_education("Post-Graduate diploma in design"),
            EducationLevel::Master
        );
    }

    #[test]
    fn test_education_be_matches_inside_words() {
        assert_eq!(
            find_education("Team member, 3 years of SQL"),
            EducationLevel::Bachelor
        );
    }

    #[test]
    fn test_education_bachelor() {
        assert_eq!(
            find_education("Bachelor's degree in Economics"),
            EducationLevel::Bachelor
        );
        assert_eq!(find_education("B.S. Computer Science"), EducationLevel::Bachelor);
    }

    #[test]
    fn test_education_doctorate() {
        assert_eq!(find_education("Doctorate, 2019"), EducationLevel::Phd);
    }

    #[test]
    fn test_education_not_specified() {
        assert_eq!(find_education("Cook, 3 years"), EducationLevel::NotSpecified);
    }
}
