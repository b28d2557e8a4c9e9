/// Localized investor report composition
///
/// Merges numeric metrics with the AI narrative into display-ready text.
/// Label tables cover Tamil, Hindi and Malayalam; any other language code
/// falls back to English labels.
use crate::models::{AiAnalysis, DerivedMetrics};

/// Labels interpolated into a report block.
#[derive(Debug, Clone, Copy)]
pub struct LabelSet {
    pub revenue: &'static str,
    pub profit: &'static str,
    pub risk: &'static str,
}

const ENGLISH_LABELS: LabelSet = LabelSet {
    revenue: "Revenue",
    profit: "Profit",
    risk: "Risk",
};

const TAMIL_LABELS: LabelSet = LabelSet {
    revenue: "வருவாய்",
    profit: "லாபம்",
    risk: "ஆபத்து நிலை",
};

const HINDI_LABELS: LabelSet = LabelSet {
    revenue: "राजस्व",
    profit: "लाभ",
    risk: "जोखिम स्तर",
};

const MALAYALAM_LABELS: LabelSet = LabelSet {
    revenue: "വരുമാനം",
    profit: "ലാഭം",
    risk: "റിസ്ക് നില",
};

/// Labels for a language code; unknown codes get English.
pub fn labels_for(lang: &str) -> LabelSet {
    match lang {
        "ta" => TAMIL_LABELS,
        "hi" => HINDI_LABELS,
        "ml" => MALAYALAM_LABELS,
        _ => ENGLISH_LABELS,
    }
}

/// Localized-display and canonical-English report blocks for one analysis.
#[derive(Debug, Clone)]
pub struct InvestorReport {
    pub display: String,
    pub english: String,
}

/// Compose both report blocks from metrics and narrative.
pub fn compose_reports(
    lang: &str,
    metrics: &DerivedMetrics,
    revenue: f64,
    analysis: &AiAnalysis,
) -> InvestorReport {
    let display = render_block(
        &labels_for(lang),
        revenue,
        metrics.profit,
        &analysis.risk_level,
        &analysis.summary_localized,
    );
    let english = render_block(
        &ENGLISH_LABELS,
        revenue,
        metrics.profit,
        &analysis.risk_level,
        &analysis.summary_en,
    );
    InvestorReport { display, english }
}

/// Fixed template: revenue line, profit line, risk line, blank line,
/// narrative summary.
fn render_block(labels: &LabelSet, revenue: f64, profit: f64, risk: &str, summary: &str) -> String {
    format!(
        "\n{}: ₹{}\n{}: ₹{}\n{}: {}\n\n{}\n",
        labels.revenue, revenue, labels.profit, profit, labels.risk, risk, summary
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics() -> DerivedMetrics {
        DerivedMetrics {
            profit: 10000.0,
            working_capital: 10000.0,
            profit_margin: 0.1,
            credit_score: 100,
        }
    }

    fn sample_analysis() -> AiAnalysis {
        AiAnalysis {
            risk_level: "Low".to_string(),
            recommendations: vec![],
            summary_en: "Healthy margins.".to_string(),
            summary_localized: "நல்ல லாபம்.".to_string(),
        }
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let report = compose_reports("xx", &sample_metrics(), 100000.0, &sample_analysis());
        assert!(report.display.contains("Revenue: ₹100000"));
        assert!(report.display.contains("Risk: Low"));
    }

    #[test]
    fn test_localized_block_uses_target_labels_and_summary() {
        let report = compose_reports("ta", &sample_metrics(), 100000.0, &sample_analysis());
        assert!(report.display.contains("வருவாய்: ₹100000"));
        assert!(report.display.contains("நல்ல லாபம்."));
        // The English block is canonical regardless of target language.
        assert!(report.english.contains("Revenue: ₹100000"));
        assert!(report.english.contains("Healthy margins."));
    }

    #[test]
    fn test_template_shape() {
        let report = compose_reports("en", &sample_metrics(), 100000.0, &sample_analysis());
        let lines: Vec<&str> = report.english.split('\n').collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "Revenue: ₹100000");
        assert_eq!(lines[2], "Profit: ₹10000");
        assert_eq!(lines[3], "Risk: Low");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Healthy margins.");
    }
}
