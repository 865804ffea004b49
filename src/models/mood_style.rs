//! Presentation metadata for mood labels. Kept apart from `MoodScale` so the
//! domain enumeration carries nothing but value, label and score.

use serde::Serialize;

use super::mood::{MoodScale, MOOD_DEFINITIONS};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MoodStyle {
    pub icon: &'static str,
    pub color: &'static str,
    pub chart_color: &'static str,
}

pub fn style_for(mood: MoodScale) -> MoodStyle {
    match mood {
        MoodScale::Awful => MoodStyle { icon: "frown", color: "#ef4444", chart_color: "hsl(var(--chart-1))" },
        MoodScale::Bad => MoodStyle { icon: "meh", color: "#f97316", chart_color: "hsl(var(--chart-2))" },
        MoodScale::Neutral => MoodStyle { icon: "smile", color: "#eab308", chart_color: "hsl(var(--chart-3))" },
        MoodScale::Good => MoodStyle { icon: "smile-plus", color: "#84cc16", chart_color: "hsl(var(--chart-4))" },
        MoodScale::Great => MoodStyle { icon: "laugh", color: "#22c55e", chart_color: "hsl(var(--chart-5))" },
    }
}

/// One row of `GET /api/moods/definitions`.
#[derive(Debug, Serialize)]
pub struct MoodDefinitionView {
    pub value: MoodScale,
    pub label: &'static str,
    pub score: u8,
    pub style: MoodStyle,
}

pub fn definition_views() -> Vec<MoodDefinitionView> {
    MOOD_DEFINITIONS
        .iter()
        .map(|d| MoodDefinitionView {
            value: d.value,
            label: d.label,
            score: d.score,
            style: style_for(d.value),
        })
        .collect()
}
