use lantern_core::{PlayerActivity, ReferenceZone, ServerStatus, StatusView};

/// Discord caps embed field values at 1024 characters.
pub const EMBED_FIELD_LIMIT: usize = 1024;

pub fn status_emoji(status: ServerStatus) -> &'static str {
  match status {
    ServerStatus::Offline => "🟥",
    ServerStatus::Online => "🟩",
    ServerStatus::Starting => "🟨",
    ServerStatus::Stopping => "🟧",
    ServerStatus::Restarting => "🔁",
    ServerStatus::Unknown => "❓",
  }
}

pub fn status_title(view: &StatusView) -> String {
  let server = if view.server_name.is_empty() {
    "Server"
  } else {
    view.server_name.as_str()
  };
  format!(
    "{} {} • {}",
    status_emoji(view.status),
    view.status_text,
    server
  )
}

pub fn players_line(view: &StatusView) -> String {
  if view.players.is_empty() {
    "Nobody online".to_string()
  } else {
    view.players.join(", ")
  }
}

/// `• Steve → 10:00–11:30, 12:00–… (1h 45m)`
pub fn activity_line(activity: &PlayerActivity) -> String {
  format!(
    "• {} → {} ({})",
    activity.player,
    activity.spans_label(),
    activity.total_label()
  )
}

pub fn activity_lines(view: &StatusView) -> String {
  if view.sessions.is_empty() {
    return "No activity yet today".to_string();
  }
  let lines = view
    .sessions
    .iter()
    .map(activity_line)
    .collect::<Vec<_>>()
    .join("\n");
  truncate_lines(&lines, EMBED_FIELD_LIMIT)
}

pub fn last_update_text(view: &StatusView, zone: ReferenceZone) -> String {
  view
    .last_update
    .map(|at| zone.format_hms(at))
    .unwrap_or_else(|| "never".to_string())
}

/// Keep whole lines up to `limit` characters, marking the cut with `…`.
pub fn truncate_lines(text: &str, limit: usize) -> String {
  if text.chars().count() <= limit {
    return text.to_string();
  }
  let mut out = String::new();
  let mut used = 0;
  for line in text.lines() {
    let cost = line.chars().count() + 1;
    // leave room for the trailing marker line
    if used + cost + 1 > limit {
      break;
    }
    out.push_str(line);
    out.push('\n');
    used += cost;
  }
  out.push('…');
  out
}
