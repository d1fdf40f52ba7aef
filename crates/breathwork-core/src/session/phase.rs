use serde::{Deserialize, Serialize};

/// One quarter of the box-breathing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Inhale,
    Hold1,
    Exhale,
    Hold2,
}

impl Phase {
    /// All phases in cycle order.
    pub const ALL: [Phase; 4] = [Phase::Inhale, Phase::Hold1, Phase::Exhale, Phase::Hold2];

    /// Next phase in cyclic order. `Hold2` wraps to `Inhale`.
    pub fn next(self) -> Phase {
        match self {
            Phase::Inhale => Phase::Hold1,
            Phase::Hold1 => Phase::Exhale,
            Phase::Exhale => Phase::Hold2,
            Phase::Hold2 => Phase::Inhale,
        }
    }

    /// Short label shown next to the breathing visual.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Inhale => "Inhale",
            Phase::Hold1 | Phase::Hold2 => "Hold",
            Phase::Exhale => "Exhale",
        }
    }

    /// Text spoken when the phase begins.
    pub fn prompt(self) -> &'static str {
        self.label()
    }

    /// One-sentence guidance for the phase.
    pub fn description(self) -> &'static str {
        match self {
            Phase::Inhale => "Breathe in smoothly, letting the air fill your lungs.",
            Phase::Hold1 => "Hold gently and soften your shoulders.",
            Phase::Exhale => "Release the breath slowly and evenly.",
            Phase::Hold2 => "Rest in the stillness before the next inhale.",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Inhale => "inhale",
            Phase::Hold1 => "hold1",
            Phase::Exhale => "exhale",
            Phase::Hold2 => "hold2",
        };
        f.write_str(name)
    }
}
