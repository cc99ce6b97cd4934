use leadgen_core::{AppViewModel, JobProgressView, LeadRowView, NotificationLevel, ScoreTier};

/// Renders the view model as plain text lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let backend = match view.backend_online {
        Some(true) => "online",
        Some(false) => "offline",
        None => "unknown",
    };
    lines.push(format!(
        "Leads: {} shown of {} | page {}/{} | selected {} | backend {}{}",
        view.visible_count,
        view.server_total,
        view.page + 1,
        view.page_count,
        view.selected_count,
        backend,
        if view.loading { " | loading" } else { "" }
    ));
    lines.push(format!(
        "High quality {} | high priority {} | average score {:.1}",
        view.summary.high_quality, view.summary.high_priority, view.summary.average_score
    ));

    if let Some(stats) = &view.stats {
        lines.push(format!(
            "Totals: {} leads, {} new this month, estimated value {:.0}",
            stats.total_leads, stats.new_this_month, stats.total_estimated_value
        ));
    }

    if let Some(job) = &view.job {
        lines.extend(render_job(job));
    }

    lines.extend(view.rows.iter().map(render_row));

    if view.delete_confirmation_pending {
        lines.push(format!(
            "Delete {} selected leads? This cannot be undone.",
            view.selected_count
        ));
    }

    for notification in &view.notifications {
        let tag = match notification.level {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "ok",
            NotificationLevel::Error => "error",
        };
        lines.push(format!("[{tag}] {}", notification.message));
    }

    lines
}

fn render_job(job: &JobProgressView) -> Vec<String> {
    let status = job
        .status
        .map_or_else(|| "starting".to_string(), |status| status.to_string());
    let mut lines = vec![format!(
        "{} job {}: {} {}/{} ({}%) {}",
        job.kind.label(),
        job.job_id,
        status,
        job.processed,
        job.total,
        job.percent,
        job.duration
    )];
    if job.error_count > 0 {
        lines.push(format!("  {} errors:", job.error_count));
        lines.extend(job.error_preview.iter().map(|error| format!("    {error}")));
    }
    if let Some(error) = &job.last_error {
        lines.push(format!("  last check failed: {error}"));
    }
    lines
}

fn render_row(row: &LeadRowView) -> String {
    let tier = match row.tier {
        ScoreTier::High => "high",
        ScoreTier::Medium => "medium",
        ScoreTier::Low => "low",
    };
    format!(
        "{} {:<32} {:>3} ({tier:<6} {:<9}) {:<10} {:<6} {}",
        if row.selected { "[x]" } else { "[ ]" },
        row.company_name,
        row.score,
        row.band.label(),
        row.status.as_str(),
        row.priority.as_str(),
        row.location.as_deref().unwrap_or("-")
    )
}
