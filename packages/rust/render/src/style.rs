//! Presentational attributes derived from report values, plus the inline
//! stylesheet.

/// Headline impact bucket, by position in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    /// Positions 0–1 are High, 2–3 Medium, the rest Low.
    pub fn for_position(index: usize) -> Self {
        match index {
            0 | 1 => Self::High,
            2 | 3 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::High => "#D64541",
            Self::Medium => "#F2A900",
            Self::Low => "#8A8F98",
        }
    }
}

/// Sentiment tone bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Danger,
}

impl Tone {
    /// 65 and up is Success, 40 and up Warning, below that Danger.
    pub fn for_score(score: u32) -> Self {
        if score >= 65 {
            Self::Success
        } else if score >= 40 {
            Self::Warning
        } else {
            Self::Danger
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Success => "#2E9E5B",
            Self::Warning => "#F2A900",
            Self::Danger => "#D64541",
        }
    }
}

/// Gauge circle radius; gives a circumference of 100 so the arc length is the score.
pub const GAUGE_RADIUS: &str = "15.9155";

pub(crate) const INLINE_CSS: &str = r#"
:root {
  --teal: #005F66;
  --orange: #FC4C02;
  --bg: #F0EDEA;
  --card-bg: #FFFFFF;
  --card-border: #E2DED9;
  --text: #1C1C1C;
  --muted: #6B6560;
  --radius: 10px;
}
*, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
body { background: var(--bg); color: var(--text); font-family: Georgia, serif; font-size: 16px; line-height: 1.7; padding: 32px 16px 48px; }
a { color: var(--teal); text-decoration: none; }
a:hover { text-decoration: underline; }
.page { max-width: 980px; margin: 0 auto; }
.masthead { background: var(--teal); color: #fff; border-radius: var(--radius) var(--radius) 0 0; padding: 36px 40px 28px; text-align: center; }
.masthead h1 { font-size: 2.1rem; line-height: 1.2; margin-bottom: 8px; }
.masthead .date { font-size: 0.75rem; letter-spacing: 0.16em; text-transform: uppercase; opacity: 0.7; }
.masthead .season { margin-top: 6px; font-style: italic; opacity: 0.85; }
.layout { display: grid; grid-template-columns: 2fr 1fr; gap: 20px; background: var(--card-bg); padding: 24px 28px; }
.main, .sidebar { display: flex; flex-direction: column; gap: 20px; }
.card { border: 1px solid var(--card-border); border-radius: var(--radius); padding: 20px 24px; background: #FDFCFB; }
.card h2 { font-size: 0.7rem; letter-spacing: 0.18em; text-transform: uppercase; color: var(--orange); border-bottom: 1.5px solid var(--orange); padding-bottom: 8px; margin-bottom: 14px; }
.headlines { list-style: none; display: flex; flex-direction: column; gap: 10px; }
.headline { display: flex; gap: 10px; align-items: baseline; }
.impact { font-size: 0.65rem; font-weight: 600; text-transform: uppercase; color: #fff; border-radius: 4px; padding: 1px 6px; }
.meta { font-size: 0.8rem; color: var(--muted); }
.gauge { display: flex; align-items: center; gap: 18px; }
.gauge svg { width: 96px; height: 96px; transform: rotate(-90deg); }
.gauge .score { font-size: 1.8rem; font-weight: 700; }
.breakdown { display: flex; height: 10px; border-radius: 5px; overflow: hidden; margin: 14px 0 6px; }
.breakdown .positive { background: #2E9E5B; }
.breakdown .neutral { background: #8A8F98; }
.breakdown .negative { background: #D64541; }
.chips { display: flex; flex-wrap: wrap; gap: 6px; margin-top: 12px; }
.chip { font-size: 0.75rem; border: 1px solid var(--card-border); border-radius: 12px; padding: 2px 10px; }
.take { border-left: 3px solid var(--orange); background: #FFF8F5; border-radius: 0 6px 6px 0; padding: 10px 14px; margin-bottom: 12px; }
.take h3 { font-size: 0.95rem; margin-bottom: 4px; }
.war-room ul, .related ul { list-style: none; display: flex; flex-direction: column; gap: 8px; }
.war-room li strong { display: block; }
.footer { background: var(--teal); color: rgba(255, 255, 255, 0.6); border-radius: 0 0 var(--radius) var(--radius); padding: 14px 32px; text-align: center; font-size: 0.75rem; }
"#;
