use crate::model::form_state::FormState;

/// A gap above this many strength points is worth acting on.
pub const SAFE_GAP: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Urgent,
    Caution,
    Ok,
    Tied,
    Leading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilitaryStatus {
    pub level: StatusLevel,
    /// Strongest opponent minus own strength
    pub gap: i64,
    pub message: String,
}

/// Compare own military strength against the strongest opponent slot.
/// Every slot counts, including ones zeroed out of the request.
pub fn evaluate(form: &FormState) -> MilitaryStatus {
    let gap = i64::from(form.strongest_opponent()) - i64::from(form.military_strength);

    let (level, message) = if gap > SAFE_GAP * 2 {
        (
            StatusLevel::Urgent,
            format!("!! Military gap of {gap} — urgent, well above safe threshold of {SAFE_GAP}"),
        )
    } else if gap > SAFE_GAP {
        (
            StatusLevel::Caution,
            format!("Military gap of {gap} — above threshold, address soon"),
        )
    } else if gap > 0 {
        (
            StatusLevel::Ok,
            format!("Military gap of {gap} — within safe threshold (≤{SAFE_GAP})"),
        )
    } else if gap == 0 {
        (
            StatusLevel::Tied,
            "Military tied with strongest opponent".to_string(),
        )
    } else {
        (
            StatusLevel::Leading,
            format!("Military leading by {} — no immediate threat", -gap),
        )
    };

    MilitaryStatus { level, gap, message }
}
