use std::sync::LazyLock;

use medrec_model::PatientInfo;
use regex::Regex;

/// Patient banner: MRN, DOB and legal sex on one line.
static PATIENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ABC Name\s*MRN:\s*(\d+).*DOB:\s*([\d/]+).*Legal Sex:\s*(\w)")
        .expect("Invalid patient banner regex")
});

pub(crate) fn detect_patient(text: &str) -> PatientInfo {
    let Some(captures) = PATIENT_REGEX.captures(text) else {
        return PatientInfo::default();
    };
    let group = |index: usize| {
        captures
            .get(index)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    };
    PatientInfo {
        name: String::new(),
        mrn: group(1),
        dob: group(2),
        sex: group(3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_banner_fields() {
        let info = detect_patient("ABC Name MRN: 12345 | DOB: 1/2/1970 | Legal Sex: F");
        assert_eq!(info.mrn, "12345");
        assert_eq!(info.dob, "1/2/1970");
        assert_eq!(info.sex, "F");
        assert!(info.name.is_empty());
    }

    #[test]
    fn banner_split_across_lines_is_ignored() {
        let info = detect_patient("ABC Name MRN: 12345\nDOB: 1/2/1970 Legal Sex: F");
        assert_eq!(info, PatientInfo::default());
    }
}
