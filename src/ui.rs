use crate::display::{AuditView, StatusRow};
use crate::engine::{AuditInputs, Capabilities, Capability};
use crate::recommendations::Recommendation;
use crate::theme::Theme;

/// Radius of the risk ring in SVG user units.
const RING_RADIUS: f64 = 46.0;

pub fn render_index(inputs: &AuditInputs, view: &AuditView, saved_theme: Option<Theme>) -> String {
    let circumference = 2.0 * std::f64::consts::PI * RING_RADIUS;
    let dash = format!("{:.2} {:.2}", view.risk.fill * circumference, circumference);
    let theme_attrs = match saved_theme {
        Some(theme) => format!(r#"data-theme="{theme}" data-theme-saved="{theme}""#),
        None => String::new(),
    };

    INDEX_HTML
        .replace("{{THEME_ATTRS}}", &theme_attrs)
        .replace("{{INCOME}}", &input_value(inputs.income_goal))
        .replace("{{AVG_CHECK}}", &input_value(inputs.avg_check))
        .replace("{{CONV_RATE}}", &input_value(inputs.conversion_rate_percent))
        .replace("{{CHOICES}}", &render_choices(&inputs.capabilities))
        .replace("{{CLIENTS}}", &view.clients_needed)
        .replace("{{LEADS}}", &view.leads_needed)
        .replace("{{MIN_BUDGET}}", &view.min_budget)
        .replace("{{MAX_BUDGET}}", &view.max_budget)
        .replace("{{RING_DASH}}", &dash)
        .replace("{{RING_STATE}}", view.risk.state.unwrap_or(""))
        .replace("{{RING_C}}", &format!("{circumference:.2}"))
        .replace("{{RISK_PERCENT}}", &view.risk.percent_text)
        .replace("{{RISK_LABEL}}", view.risk.label)
        .replace("{{ALERT_HIDDEN}}", if view.alert.is_some() { "" } else { "hidden" })
        .replace("{{ALERT_TEXT}}", view.alert.as_deref().unwrap_or(""))
        .replace("{{STATUS_ROWS}}", &render_status_rows(&view.status_rows))
        .replace("{{RECOMMENDATIONS}}", &render_recommendations(&view.recommendations))
}

fn input_value(value: f64) -> String {
    if value > 0.0 { value.to_string() } else { String::new() }
}

fn render_choices(capabilities: &Capabilities) -> String {
    Capability::ALL
        .into_iter()
        .map(|capability| {
            let (name, legend) = match capability {
                Capability::Crm => ("crm", "Do you use a CRM?"),
                Capability::Sales => ("sales", "Do you have sales staff?"),
                Capability::Smm => ("smm", "Do you run SMM / marketing?"),
            };
            let (yes, no) = if capabilities.has(capability) {
                ("checked", "")
            } else {
                ("", "checked")
            };
            format!(
                r#"<fieldset class="choice"><legend>{legend}</legend>
          <label><input type="radio" name="{name}" value="yes" {yes} /> Yes</label>
          <label><input type="radio" name="{name}" value="no" {no} /> No</label>
        </fieldset>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}

pub fn render_status_rows(rows: &[StatusRow]) -> String {
    rows.iter()
        .map(|row| {
            let (class, icon) = if row.good {
                ("status-indicator--good", CHECK_ICON)
            } else {
                ("status-indicator--bad", CROSS_ICON)
            };
            format!(
                r#"<div class="status-row"><span class="status-indicator {class}">{icon}</span><span class="status-title">{}</span><span class="status-desc">{}</span></div>"#,
                row.title, row.description
            )
        })
        .collect()
}

pub fn render_recommendations(cards: &[Recommendation]) -> String {
    if cards.is_empty() {
        return EMPTY_RECS.to_string();
    }

    cards
        .iter()
        .enumerate()
        .map(|(index, card)| {
            let kind = card.kind.as_str();
            format!(
                r#"<div class="rec-item rec-item--{kind}" role="listitem" style="animation-delay: {}ms"><div class="rec-priority rec-priority--{kind}">{}</div><div class="rec-text"><div class="rec-title">{}</div><div class="rec-desc">{}</div></div></div>"#,
                index * 80,
                card.icon,
                card.title,
                card.description
            )
        })
        .collect()
}

const CHECK_ICON: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2.5" stroke-linecap="round" stroke-linejoin="round"><polyline points="20 6 9 17 4 12"/></svg>"#;
const CROSS_ICON: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2.5" stroke-linecap="round" stroke-linejoin="round"><line x1="18" x2="6" y1="6" y2="18"/><line x1="6" x2="18" y1="6" y2="18"/></svg>"#;
const EMPTY_RECS: &str = r#"<div class="recs-empty"><p>Fill in the numbers and recommendations appear automatically.</p></div>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en" {{THEME_ATTRS}}>
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Business Audit</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --card: rgba(255, 255, 255, 0.9);
      --ink: #1f2328;
      --muted: #6b6f76;
      --line: rgba(31, 35, 40, 0.08);
      --safe: #1f9d6b;
      --medium: #e0a526;
      --danger: #d9463b;
      --accent: #2f4858;
      --shadow: 0 24px 60px rgba(31, 35, 40, 0.14);
    }

    [data-theme="dark"] {
      --bg: #121417;
      --card: rgba(30, 33, 38, 0.92);
      --ink: #eceff3;
      --muted: #9aa1ab;
      --line: rgba(236, 239, 243, 0.08);
      --accent: #8fb3c9;
      --shadow: 0 24px 60px rgba(0, 0, 0, 0.45);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
      transition: background 200ms ease, color 200ms ease;
    }

    .app {
      width: min(980px, 100%);
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 24px;
    }

    header {
      grid-column: 1 / -1;
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    h1 { margin: 0; font-size: clamp(1.8rem, 4vw, 2.4rem); }

    .card {
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 18px;
      align-content: start;
    }

    label.field { display: grid; gap: 6px; font-size: 0.9rem; color: var(--muted); }

    input[type="number"] {
      font: inherit;
      font-size: 1.1rem;
      padding: 12px 14px;
      border-radius: 12px;
      border: 1px solid var(--line);
      background: transparent;
      color: var(--ink);
    }

    .choice { border: none; padding: 0; margin: 0; display: flex; gap: 14px; align-items: center; flex-wrap: wrap; }
    .choice legend { font-size: 0.9rem; color: var(--muted); margin-bottom: 6px; }

    .kpis { display: grid; grid-template-columns: repeat(2, 1fr); gap: 12px; }
    .kpi { padding: 14px; border-radius: 16px; border: 1px solid var(--line); }
    .kpi .label { font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.1em; color: var(--muted); }
    .kpi .value { font-size: 1.6rem; font-weight: 600; }

    .risk { display: flex; gap: 18px; align-items: center; }
    .ring { width: 120px; height: 120px; transform: rotate(-90deg); }
    .ring circle { fill: none; stroke-width: 10; }
    .ring .track { stroke: var(--line); }
    .ring .fill { stroke: var(--muted); stroke-linecap: round; transition: stroke-dasharray 600ms ease; }
    .ring .fill.state-safe { stroke: var(--safe); }
    .ring .fill.state-medium { stroke: var(--medium); }
    .ring .fill.state-danger { stroke: var(--danger); }
    .risk-text .percent { font-size: 1.8rem; font-weight: 700; }
    .risk-text .label { letter-spacing: 0.12em; color: var(--muted); }

    .alert { display: flex; gap: 10px; padding: 12px 14px; border-radius: 12px; background: rgba(217, 70, 59, 0.12); color: var(--danger); }
    .alert[hidden] { display: none; }

    .status-row { display: grid; grid-template-columns: 28px 1fr; gap: 2px 10px; align-items: center; }
    .status-indicator { grid-row: span 2; width: 26px; height: 26px; border-radius: 50%; display: grid; place-items: center; }
    .status-indicator svg { width: 14px; height: 14px; }
    .status-indicator--good { background: rgba(31, 157, 107, 0.15); color: var(--safe); }
    .status-indicator--bad { background: rgba(217, 70, 59, 0.15); color: var(--danger); }
    .status-desc { font-size: 0.85rem; color: var(--muted); }

    .rec-item { display: flex; gap: 12px; align-items: center; padding: 12px; border-radius: 14px; border: 1px solid var(--line); animation: rise 400ms ease both; }
    .rec-priority { width: 36px; height: 36px; border-radius: 10px; display: grid; place-items: center; flex-shrink: 0; }
    .rec-priority svg { width: 18px; height: 18px; }
    .rec-priority--danger { color: var(--danger); background: rgba(217, 70, 59, 0.12); }
    .rec-priority--warning { color: var(--medium); background: rgba(224, 165, 38, 0.14); }
    .rec-priority--default { color: var(--accent); background: var(--line); }
    .rec-title { font-weight: 600; }
    .rec-desc { font-size: 0.85rem; color: var(--muted); }
    .recs-empty { color: var(--muted); font-size: 0.9rem; }

    #themeToggle { font: inherit; border: 1px solid var(--line); background: var(--card); color: var(--ink); border-radius: 999px; padding: 8px 16px; cursor: pointer; }

    @keyframes rise {
      from { opacity: 0; transform: translateY(8px); }
      to { opacity: 1; transform: translateY(0); }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Business Audit</h1>
      <button id="themeToggle" type="button" aria-label="Switch theme">Theme</button>
    </header>

    <form class="card" id="auditForm" method="get" action="/">
      <label class="field">Monthly income goal ($)
        <input type="number" id="incomeGoal" name="income_goal" min="0" step="any" value="{{INCOME}}" />
      </label>
      <label class="field">Average check ($)
        <input type="number" id="avgCheck" name="avg_check" min="0" step="any" value="{{AVG_CHECK}}" />
      </label>
      <label class="field">Conversion rate (%)
        <input type="number" id="convRate" name="conversion_rate" min="0" max="100" step="any" value="{{CONV_RATE}}" />
      </label>
      <div class="choices">
        {{CHOICES}}
      </div>
      <noscript><button type="submit">Calculate</button></noscript>
    </form>

    <section class="card">
      <div class="kpis">
        <div class="kpi"><div class="label">Clients needed</div><div class="value" id="clientsNeeded">{{CLIENTS}}</div></div>
        <div class="kpi"><div class="label">Leads needed</div><div class="value" id="leadsNeeded">{{LEADS}}</div></div>
        <div class="kpi"><div class="label">Min ad budget</div><div class="value" id="minBudget">{{MIN_BUDGET}}</div></div>
        <div class="kpi"><div class="label">Max ad budget</div><div class="value" id="maxBudget">{{MAX_BUDGET}}</div></div>
      </div>

      <div class="risk">
        <svg class="ring" viewBox="0 0 120 120" aria-hidden="true">
          <circle class="track" cx="60" cy="60" r="46" />
          <circle class="fill {{RING_STATE}}" id="donutRing" cx="60" cy="60" r="46" style="stroke-dasharray: {{RING_DASH}}" data-circumference="{{RING_C}}" />
        </svg>
        <div class="risk-text">
          <div class="percent" id="riskPercent">{{RISK_PERCENT}}</div>
          <div class="label" id="riskLabel">{{RISK_LABEL}}</div>
        </div>
      </div>

      <div class="alert" id="impactAlert" role="alert" {{ALERT_HIDDEN}}>
        <span id="impactText">{{ALERT_TEXT}}</span>
      </div>

      <div id="statusRows">{{STATUS_ROWS}}</div>
    </section>

    <section class="card">
      <h2>Recommendations</h2>
      <div id="recommendationsList" role="list">{{RECOMMENDATIONS}}</div>
    </section>
  </main>

  <script>
    const html = document.documentElement;
    const themeBtn = document.getElementById('themeToggle');
    const darkQuery = window.matchMedia('(prefers-color-scheme: dark)');

    const applyTheme = (payload) => {
      html.setAttribute('data-theme', payload.theme);
      themeBtn.setAttribute('aria-label', payload.toggle_label);
    };

    const themeRequest = async (url, method, body) => {
      const res = await fetch(url, {
        method,
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body)
      });
      if (!res.ok) {
        throw new Error('Theme request failed');
      }
      applyTheme(await res.json());
    };

    fetch(`/api/theme?prefers_dark=${darkQuery.matches}`)
      .then((res) => res.json())
      .then(applyTheme)
      .catch(() => html.setAttribute('data-theme', darkQuery.matches ? 'dark' : 'light'));

    themeBtn.addEventListener('click', () => {
      themeRequest('/api/theme/toggle', 'POST', {
        current: html.getAttribute('data-theme'),
        prefers_dark: darkQuery.matches
      }).catch(() => {});
    });

    darkQuery.addEventListener('change', (event) => {
      themeRequest('/api/theme/system', 'POST', { prefers_dark: event.matches }).catch(() => {});
    });

    const form = document.getElementById('auditForm');
    const ring = document.getElementById('donutRing');
    const circumference = Number(ring.dataset.circumference);
    const els = {
      clients: document.getElementById('clientsNeeded'),
      leads: document.getElementById('leadsNeeded'),
      minBudget: document.getElementById('minBudget'),
      maxBudget: document.getElementById('maxBudget'),
      riskPercent: document.getElementById('riskPercent'),
      riskLabel: document.getElementById('riskLabel'),
      alert: document.getElementById('impactAlert'),
      alertText: document.getElementById('impactText'),
      status: document.getElementById('statusRows'),
      recs: document.getElementById('recommendationsList')
    };

    const fmt = (num) => num.toLocaleString('en-US');
    let latestSeq = 0;
    let appliedSeq = 0;

    const animateNumber = (el, endVal, prefix = '') => {
      const start = performance.now();
      const duration = 600;
      const step = (now) => {
        const progress = Math.min((now - start) / duration, 1);
        const eased = 1 - Math.pow(1 - progress, 3);
        el.textContent = prefix + fmt(Math.round(endVal * eased));
        if (progress < 1 && el.dataset.seq === String(appliedSeq)) {
          requestAnimationFrame(step);
        }
      };
      el.dataset.seq = String(appliedSeq);
      requestAnimationFrame(step);
    };

    const statusMarkup = (rows) => rows.map((row) => `
      <div class="status-row">
        <span class="status-indicator ${row.good ? 'status-indicator--good' : 'status-indicator--bad'}">${row.good ? '&#10003;' : '&#10005;'}</span>
        <span class="status-title">${row.title}</span>
        <span class="status-desc">${row.description}</span>
      </div>`).join('');

    const recMarkup = (cards) => cards.map((card, i) => `
      <div class="rec-item rec-item--${card.kind}" role="listitem" style="animation-delay: ${i * 80}ms">
        <div class="rec-priority rec-priority--${card.kind}">${card.icon}</div>
        <div class="rec-text">
          <div class="rec-title">${card.title}</div>
          <div class="rec-desc">${card.description}</div>
        </div>
      </div>`).join('');

    const render = (view) => {
      els.status.innerHTML = statusMarkup(view.status_rows);
      ring.classList.remove('state-safe', 'state-medium', 'state-danger');
      els.riskPercent.textContent = view.risk.percent_text;
      els.riskLabel.textContent = view.risk.label;
      ring.style.strokeDasharray = `${view.risk.fill * circumference} ${circumference}`;

      if (!view.complete) {
        els.clients.textContent = view.clients_needed;
        els.leads.textContent = view.leads_needed;
        els.minBudget.textContent = view.min_budget;
        els.maxBudget.textContent = view.max_budget;
        els.alert.hidden = true;
        els.recs.innerHTML = `<div class="recs-empty"><p>Fill in the numbers and recommendations appear automatically.</p></div>`;
        return;
      }

      ring.classList.add(view.risk.state);
      animateNumber(els.clients, view.targets.clients_needed);
      animateNumber(els.leads, view.targets.leads_needed);
      animateNumber(els.minBudget, view.targets.min_budget, '$');
      animateNumber(els.maxBudget, view.targets.max_budget, '$');

      els.alert.hidden = !view.alert;
      els.alertText.textContent = view.alert || '';
      els.recs.innerHTML = recMarkup(view.recommendations);
    };

    const calculate = async () => {
      const seq = ++latestSeq;
      const data = new FormData(form);
      const res = await fetch('/api/audit', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({
          income_goal: data.get('income_goal') || '',
          avg_check: data.get('avg_check') || '',
          conversion_rate: data.get('conversion_rate') || '',
          crm: data.get('crm') || 'no',
          sales: data.get('sales') || 'no',
          smm: data.get('smm') || 'no'
        })
      });
      if (!res.ok || seq < appliedSeq) {
        return;
      }
      const payload = await res.json();
      if (seq < appliedSeq) {
        return;
      }
      appliedSeq = seq;
      render(payload.view);
    };

    form.addEventListener('input', () => { calculate().catch(() => {}); });
    form.addEventListener('change', () => { calculate().catch(() => {}); });
    form.addEventListener('submit', (event) => {
      event.preventDefault();
      calculate().catch(() => {});
    });
  </script>
</body>
</html>
"#;
