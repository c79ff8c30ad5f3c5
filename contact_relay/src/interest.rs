/// Course a visitor picked on the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interest {
    Beginner,
    Intermediate,
    Advanced,
    Consult,
}

impl Interest {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "beginner" => Some(Interest::Beginner),
            "intermediate" => Some(Interest::Intermediate),
            "advanced" => Some(Interest::Advanced),
            "consult" => Some(Interest::Consult),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Interest::Beginner => "交易基础入门",
            Interest::Intermediate => "系统交易策略",
            Interest::Advanced => "专业交易员特训",
            Interest::Consult => "不确定，需要咨询",
        }
    }
}

/// Display label for a form code; unknown codes pass through verbatim.
pub fn interest_label(code: &str) -> &str {
    Interest::from_code(code).map_or(code, |i| i.label())
}
