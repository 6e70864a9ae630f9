//! Text renderers for the dashboard pages.
//!
//! Purely presentational: every numeric insight arrives prebuilt from the
//! gateway or the view-model builders, and these functions only lay it out.
//! Empty and failed results render dedicated empty states, never errors.

use crate::analytics::{conversion_message, model_health_message, Thresholds};
use crate::format::{format_count, format_currency, format_percent, format_signed_percent};
use crate::models::{
    AnalyticsSnapshot, Client, FactorAttribution, PredictionEnvelope, Provenance, Segment,
    SegmentComparison,
};

/// Width of rendered progress bars, in cells.
const BAR_WIDTH: usize = 20;

/// Average predicted income shown on the dashboard headline.
const DASHBOARD_AVERAGE_INCOME: f64 = 85_430.0;

/// Renders a percentage in [0, 100] as a fixed-width bar.
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let clamped = percentage.clamp(0.0, 100.0);
    let filled = (clamped / 100.0 * width as f64).round() as usize;
    let mut bar = String::with_capacity(width * 3);
    for i in 0..width {
        bar.push(if i < filled { '█' } else { '░' });
    }
    bar
}

/// Fixed headline stats shown on the dashboard landing page.
pub fn render_dashboard_stats() -> String {
    let mut out = String::new();
    out.push_str("AlphaPredict AI • Прогнозирование доходов клиентов\n");
    out.push_str(&format!(
        "  Всего клиентов: {} (+12.5% за месяц)\n",
        format_count(15_247)
    ));
    out.push_str(&format!(
        "  Средний доход: {} • Предсказанный (сегмент: {})\n",
        format_currency(DASHBOARD_AVERAGE_INCOME),
        Segment::from_income(DASHBOARD_AVERAGE_INCOME),
    ));
    out.push_str(&format!(
        "  Точность модели: {} • v3.0 • 150+ параметров\n",
        format_percent(94.2, 1)
    ));
    out.push_str(&format!(
        "  Прогнозов сегодня: {} (+8.2% к вчера)\n",
        format_count(1_543)
    ));
    out.push('\n');
    out
}

/// Empty state for a missing client.
pub fn render_not_found() -> String {
    "Клиент не найден\n".to_string()
}

/// Dashboard quick-search result: best-match summary or the no-match state.
pub fn render_search_result(best_match: Option<&Client>) -> String {
    match best_match {
        Some(client) => format!(
            "Найден клиент: {} (ID: {})\nСегмент: {} • Доход: {} • Рейтинг: {}/10\n",
            client.name,
            client.id,
            client.segment,
            format_currency(client.income),
            client.score,
        ),
        None => render_not_found(),
    }
}

/// Client directory listing.
pub fn render_client_list(clients: &[Client]) -> String {
    if clients.is_empty() {
        return "Клиенты не найдены\n".to_string();
    }

    let mut out = format!("База клиентов • {} клиентов в базе\n\n", clients.len());
    for client in clients {
        out.push_str(&format!(
            "{:<3} {}\n    ID: {} • {}\n    Прогноз дохода: {} • Рейтинг: {}/10 • {}\n",
            client.segment.badge(),
            client.name,
            client.id,
            client.region,
            format_currency(client.income),
            client.score,
            client.segment,
        ));
    }
    out
}

/// Full client profile page: card, prediction widget, explainer, comparison,
/// recommendations and the stimulation section.
pub fn render_client_profile(
    client: &Client,
    envelope: &PredictionEnvelope,
    comparison: &SegmentComparison,
    attributions: &[FactorAttribution],
) -> String {
    let mut out = String::new();

    // Client card
    let age = client
        .age
        .map(|a| format!("{} лет", a))
        .unwrap_or_else(|| "Не указан".to_string());
    out.push_str(&format!(
        "Профиль клиента • ID: {}\n{} • {} • {}\n",
        client.id, client.name, age, client.region
    ));
    out.push_str(&format!(
        "Текущий доход: {}\nСегмент: {}\nКредитный рейтинг: {}/10\n\n",
        format_currency(client.income),
        client.segment,
        client.score,
    ));

    // Prediction widget
    out.push_str(&format!(
        "Прогноз дохода • ML-модель v3.0 • {}\n",
        envelope.provenance.label()
    ));
    out.push_str(&format!(
        "{}\nДиапазон: {} - {}\n",
        format_currency(envelope.predicted_income),
        format_currency(envelope.confidence_interval.min),
        format_currency(envelope.confidence_interval.max),
    ));
    let uplift = envelope.uplift_percent(client.income);
    if uplift != 0.0 {
        out.push_str(&format!(
            "{} к текущему доходу\n",
            format_signed_percent(uplift, 1)
        ));
    }
    out.push_str(&format!(
        "Доверительный интервал: {} {}\n",
        format_percent(envelope.confidence * 100.0, 0),
        progress_bar(envelope.confidence * 100.0, BAR_WIDTH),
    ));
    if !envelope.factors.is_empty() {
        out.push_str(&format!("Ключевые факторы: {}\n", envelope.factors.join(", ")));
    }
    out.push_str(match envelope.provenance {
        Provenance::Live => "Реальное предсказание\n\n",
        Provenance::Placeholder => "Моковые данные • Загрузка реальных...\n\n",
    });

    // SHAP-style explainer
    out.push_str("Факторы влияния на прогноз\n");
    for attribution in attributions {
        out.push_str(&format!(
            "  {:<22} {:>5} • {} {}\n",
            attribution.feature,
            format_signed_percent(attribution.impact, 0),
            attribution.value,
            progress_bar(attribution.impact.abs(), BAR_WIDTH),
        ));
    }
    out.push('\n');

    // Comparative analytics
    out.push_str(&format!(
        "Сравнительная аналитика • Позиция в сегменте \"{}\": {}\n",
        client.segment, comparison.percentile_label
    ));
    out.push_str(&format!(
        "  Ваш клиент: {}\n  Средний в сегменте: {}\n  Топ в сегменте: {}\n\n",
        format_currency(comparison.client_income),
        format_currency(comparison.segment_average),
        format_currency(comparison.segment_top),
    ));

    // Recommendations
    if !envelope.recommendations.is_empty() {
        out.push_str("Рекомендации продуктов\n");
        for recommendation in &envelope.recommendations {
            out.push_str(&format!(
                "  {} — {}\n",
                recommendation.product, recommendation.reason
            ));
        }
        out.push('\n');
    }

    // Stimulation scenario
    out.push_str(&format!(
        "Стимуляция клиента • При увеличении дохода на 20% (до {}):\n",
        format_currency(client.income * 1.2)
    ));
    out.push_str("  • Кредитная карта с кэшбэком 10%\n");
    out.push_str("  • Премиальный пакет услуг бесплатно\n");
    out.push_str("  • Доступ к VIP-консультанту\n");

    out
}

/// Analytics page: model monitoring, segmentation breakdown and business metrics.
pub fn render_analytics(
    snapshot: &AnalyticsSnapshot,
    provenance: Provenance,
    thresholds: &Thresholds,
) -> String {
    let mut out = String::new();
    let performance = &snapshot.model_performance;

    out.push_str("Мониторинг модели • Метрики качества ML-модели v3.0\n");
    if !provenance.is_live() {
        out.push_str("(резервные данные, бэкенд недоступен)\n");
    }
    out.push_str(&format!(
        "  Точность (Accuracy): {} {}\n",
        format_percent(performance.accuracy, 1),
        progress_bar(performance.accuracy, BAR_WIDTH),
    ));
    out.push_str(&format!(
        "  Precision: {} {}\n",
        format_percent(performance.precision, 1),
        progress_bar(performance.precision, BAR_WIDTH),
    ));
    out.push_str(&format!(
        "  Recall: {} {}\n",
        format_percent(performance.recall, 1),
        progress_bar(performance.recall, BAR_WIDTH),
    ));
    out.push_str(&format!(
        "  {}\n\n",
        model_health_message(performance, thresholds)
    ));

    out.push_str("Сегментация клиентов • Распределение по сегментам\n");
    for share in &snapshot.segmentation {
        out.push_str(&format!(
            "  {:<10} {} ({}) {}\n",
            share.segment.label(),
            format_count(share.count),
            format_percent(share.percentage, 1),
            progress_bar(share.percentage, BAR_WIDTH),
        ));
    }
    out.push('\n');

    let metrics = &snapshot.business_metrics;
    out.push_str("Бизнес-метрики • Эффективность рекомендаций за последний месяц\n");
    out.push_str(&format!(
        "  Конверсия рекомендаций: {} ({})\n",
        format_percent(metrics.conversion_rate, 1),
        conversion_message(metrics, thresholds),
    ));
    out.push_str(&format!(
        "  Средний чек по одобрениям: {}\n",
        format_currency(metrics.average_ticket)
    ));
    out.push_str(&format!(
        "  ROI модели: {} (за год использования)\n",
        format_percent(metrics.roi, 0)
    ));

    out
}
