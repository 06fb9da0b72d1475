/// Output counter a grade token is tallied under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradeCounter {
    APlus,
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    DMinus,
    F,
    Incomplete,
    Pass,
    NoPass,
    Y,
}

impl GradeCounter {
    pub const ALL: [GradeCounter; 17] = [
        GradeCounter::APlus,
        GradeCounter::A,
        GradeCounter::AMinus,
        GradeCounter::BPlus,
        GradeCounter::B,
        GradeCounter::BMinus,
        GradeCounter::CPlus,
        GradeCounter::C,
        GradeCounter::CMinus,
        GradeCounter::DPlus,
        GradeCounter::D,
        GradeCounter::DMinus,
        GradeCounter::F,
        GradeCounter::Incomplete,
        GradeCounter::Pass,
        GradeCounter::NoPass,
        GradeCounter::Y,
    ];

    /// Maps a grade token from the export to its counter.
    ///
    /// | Tokens          | Counter  |
    /// |-----------------|----------|
    /// | A+ .. D-, F     | aplus .. dminus, f |
    /// | I               | I        |
    /// | P, P*           | P        |
    /// | NP, NP*         | NP       |
    /// | Y, RW           | Y        |
    ///
    /// Any other token returns `None` and is not counted.
    pub fn from_token(token: &str) -> Option<Self> {
        let counter = match token {
            "A+" => GradeCounter::APlus,
            "A" => GradeCounter::A,
            "A-" => GradeCounter::AMinus,
            "B+" => GradeCounter::BPlus,
            "B" => GradeCounter::B,
            "B-" => GradeCounter::BMinus,
            "C+" => GradeCounter::CPlus,
            "C" => GradeCounter::C,
            "C-" => GradeCounter::CMinus,
            "D+" => GradeCounter::DPlus,
            "D" => GradeCounter::D,
            "D-" => GradeCounter::DMinus,
            "F" => GradeCounter::F,
            "I" => GradeCounter::Incomplete,
            "P" | "P*" => GradeCounter::Pass,
            "NP" | "NP*" => GradeCounter::NoPass,
            "Y" | "RW" => GradeCounter::Y,
            _ => return None,
        };
        Some(counter)
    }

    /// JSON field name of the counter.
    pub fn field_name(self) -> &'static str {
        match self {
            GradeCounter::APlus => "aplus",
            GradeCounter::A => "a",
            GradeCounter::AMinus => "aminus",
            GradeCounter::BPlus => "bplus",
            GradeCounter::B => "b",
            GradeCounter::BMinus => "bminus",
            GradeCounter::CPlus => "cplus",
            GradeCounter::C => "c",
            GradeCounter::CMinus => "cminus",
            GradeCounter::DPlus => "dplus",
            GradeCounter::D => "d",
            GradeCounter::DMinus => "dminus",
            GradeCounter::F => "f",
            GradeCounter::Incomplete => "I",
            GradeCounter::Pass => "P",
            GradeCounter::NoPass => "NP",
            GradeCounter::Y => "Y",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_grades() {
        assert_eq!(GradeCounter::from_token("A+"), Some(GradeCounter::APlus));
        assert_eq!(GradeCounter::from_token("A-"), Some(GradeCounter::AMinus));
        assert_eq!(GradeCounter::from_token("C"), Some(GradeCounter::C));
        assert_eq!(GradeCounter::from_token("D-"), Some(GradeCounter::DMinus));
        assert_eq!(GradeCounter::from_token("F"), Some(GradeCounter::F));
    }

    #[test]
    fn test_merged_status_tokens() {
        assert_eq!(GradeCounter::from_token("P*"), GradeCounter::from_token("P"));
        assert_eq!(GradeCounter::from_token("NP*"), GradeCounter::from_token("NP"));
        assert_eq!(GradeCounter::from_token("RW"), Some(GradeCounter::Y));
        assert_eq!(GradeCounter::from_token("I"), Some(GradeCounter::Incomplete));
    }

    #[test]
    fn test_unknown_tokens() {
        assert_eq!(GradeCounter::from_token("W"), None);
        assert_eq!(GradeCounter::from_token("a"), None);
        assert_eq!(GradeCounter::from_token("F+"), None);
        assert_eq!(GradeCounter::from_token(""), None);
    }

    #[test]
    fn test_field_names_are_unique() {
        let mut names: Vec<_> = GradeCounter::ALL.iter().map(|c| c.field_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), GradeCounter::ALL.len());
    }
}
