use crate::models::TodayResponse;

pub fn render_index(today: &TodayResponse) -> String {
    INDEX_HTML
        .replace("{{DATE}}", &today.date)
        .replace("{{COUNT}}", &today.count.to_string())
        .replace("{{LAST}}", today.last_log_time.as_deref().unwrap_or(""))
        .replace("{{PROGRESS}}", &format!("{:.3}", today.progress))
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Consumption</title>
  <style>
    :root {
      --bg: #faf7f2;
      --ink: #2b2a28;
      --muted: #7a746d;
      --accent: #c8553d;
      --soft: #f1e9df;
      --warn: #fff1d6;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(43, 42, 40, 0.12);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: center;
      padding: 14px 20px;
      border-bottom: 1px solid var(--soft);
      max-width: 520px;
      margin: 0 auto;
    }

    h1 { font-size: 1rem; margin: 0; }
    h3 {
      font-size: 0.8rem;
      letter-spacing: 0.08em;
      text-transform: uppercase;
      color: var(--muted);
      margin: 0 0 14px;
    }

    main {
      max-width: 520px;
      margin: 0 auto;
      padding: 0 20px 48px;
      display: grid;
      gap: 28px;
    }

    .ring { display: grid; place-items: center; padding-top: 28px; }
    .ring svg { transform: rotate(-90deg); }
    .ring-count {
      position: absolute;
      font-size: 3.4rem;
      font-family: Georgia, serif;
    }
    .ring-wrap { position: relative; display: grid; place-items: center; }
    .hint { color: var(--muted); font-size: 0.8rem; margin: 6px 0 0; text-align: center; }

    .actions { display: flex; justify-content: center; gap: 16px; }
    .actions form { margin: 0; }
    button {
      border: none;
      border-radius: 16px;
      cursor: pointer;
      font-family: inherit;
    }
    .btn-remove { width: 64px; height: 64px; background: var(--soft); font-size: 1.6rem; }
    .btn-add { width: 80px; height: 80px; background: var(--accent); color: #fff; font-size: 2rem; box-shadow: var(--shadow); }
    button:disabled { opacity: 0.3; cursor: not-allowed; }

    .message {
      min-height: 44px;
      text-align: center;
      background: var(--warn);
      border-radius: 12px;
      padding: 12px;
      font-size: 0.9rem;
    }
    .message:empty { background: transparent; }

    .chips { display: flex; flex-wrap: wrap; gap: 6px; margin-bottom: 10px; }
    .chip { padding: 6px 12px; border-radius: 999px; background: var(--soft); font-size: 0.8rem; }
    .chip.on { background: var(--accent); color: #fff; }
    textarea { width: 100%; border-radius: 10px; border: 1px solid var(--soft); padding: 8px; font-family: inherit; }

    .stat-hero { font-size: 2.4rem; color: var(--accent); margin: 0; font-family: Georgia, serif; }
    .stat { font-size: 1.5rem; margin: 0; font-family: Georgia, serif; }
    .stat-label { color: var(--muted); font-size: 0.85rem; margin: 2px 0 14px; }

    .bars { display: flex; align-items: flex-end; gap: 8px; height: 110px; }
    .bar { flex: 1; display: flex; flex-direction: column; align-items: center; gap: 4px; font-size: 0.75rem; color: var(--muted); }
    .bar span.fill { width: 100%; max-width: 28px; border-radius: 6px 6px 0 0; background: rgba(200, 85, 61, 0.3); }
    .bar.today span.fill { background: var(--accent); }
    .bar.today { color: var(--accent); font-weight: 600; }

    .panel { background: var(--soft); border-radius: 16px; padding: 16px; }
    .panel.warn { background: var(--warn); }
    .hidden { display: none !important; }

    .setup label { display: block; font-size: 0.85rem; margin: 12px 0 4px; }
    .setup input, .setup select { width: 100%; padding: 8px; border-radius: 10px; border: 1px solid #ddd; }
    .setup .row { display: flex; gap: 8px; }
    .primary { background: var(--accent); color: #fff; padding: 12px; width: 100%; margin-top: 16px; }
    .link { background: none; color: var(--muted); padding: 8px; width: 100%; }

    .history-day { margin-bottom: 16px; }
    .history-day h4 { margin: 0 0 6px; font-size: 0.8rem; color: var(--muted); }
    .history-item { display: flex; justify-content: space-between; align-items: center; padding: 8px 0; border-bottom: 1px solid var(--soft); font-size: 0.9rem; }
    .history-item small { color: var(--muted); display: block; }
    .history-item small.notes { font-style: italic; }
    .delete { background: none; color: var(--muted); font-size: 1rem; }
  </style>
</head>
<body>
  <header>
    <h1>Consumption</h1>
    <button id="history-btn" class="link" type="button" style="width:auto">History</button>
  </header>
  <main>
    <section class="ring">
      <div class="ring-wrap">
        <svg width="240" height="240" viewBox="0 0 240 240">
          <circle cx="120" cy="120" r="100" fill="none" stroke="#f1e9df" stroke-width="8" />
          <circle id="ring-bar" cx="120" cy="120" r="100" fill="none" stroke="#c8553d" stroke-width="8"
            stroke-linecap="round" stroke-dasharray="628.32" data-progress="{{PROGRESS}}" />
        </svg>
        <span id="count" class="ring-count">{{COUNT}}</span>
      </div>
      <p class="hint" id="last-log" data-last="{{LAST}}"></p>
      <p class="hint">Today, {{DATE}}</p>
    </section>

    <section class="actions">
      <form id="remove-form" method="post" action="/log/remove">
        <button class="btn-remove" id="remove-btn" type="submit">&minus;</button>
      </form>
      <form id="add-form" method="post" action="/log/add">
        <button class="btn-add" id="add-btn" type="submit">+</button>
      </form>
    </section>

    <div class="message" id="message"></div>

    <section id="details">
      <button class="link" id="details-toggle" type="button">+ Add detail</button>
      <div id="details-body" class="hidden">
        <h3>Where</h3>
        <div class="chips" data-field="location" data-options="Home|Work|Outside|Social|Car"></div>
        <h3>What triggered it</h3>
        <div class="chips" data-field="trigger" data-options="Stress|Boredom|After meal|With coffee|Social|Habit"></div>
        <h3>Mood</h3>
        <div class="chips" data-field="mood" data-options="😊|😐|😔|😤|😰"></div>
        <h3>Notes</h3>
        <textarea id="notes" rows="2" placeholder="Anything else?"></textarea>
      </div>
    </section>

    <section id="lifetime" class="hidden">
      <h3>Lifetime impact</h3>
      <p class="stat-hero" id="life-days"></p>
      <p class="stat-label" id="life-days-detail"></p>
      <p class="stat" id="spend"></p>
      <p class="stat-label">spent on cigarettes</p>
      <p class="stat" id="packs"></p>
      <p class="stat-label">packs smoked</p>
    </section>

    <section id="insight" class="panel hidden"></section>

    <section id="week" class="hidden">
      <h3>This week</h3>
      <div class="bars" id="bars"></div>
    </section>

    <section id="risk" class="panel warn hidden">
      <strong>Your consumption has increased significantly this week</strong>
      <p class="hint" style="text-align:left">Consider talking to a counsellor.</p>
    </section>

    <button id="setup-prompt" class="panel hidden" type="button" style="text-align:left">
      <strong>Set up your profile</strong>
      <span class="hint" style="display:block;text-align:left">See your lifetime impact with a quick 30-second setup</span>
    </button>

    <section id="setup" class="panel setup hidden">
      <h3>Quick setup</h3>
      <label>I've smoked since</label>
      <div class="row">
        <select id="start-month"></select>
        <input id="start-year" type="number" min="1900" />
      </div>
      <label for="avg">Average cigarettes per day</label>
      <input id="avg" type="number" min="0" value="10" />
      <label for="per-pack">Cigarettes per pack</label>
      <select id="per-pack"><option>10</option><option selected>20</option></select>
      <label for="cost">Cost per cigarette</label>
      <input id="cost" type="number" min="1" value="16" />
      <button class="primary" id="setup-save" type="button">Save &amp; continue</button>
      <button class="link" id="setup-skip" type="button">Skip for now</button>
      <p class="hint" id="setup-error"></p>
    </section>

    <section id="history" class="hidden">
      <h3>History</h3>
      <div id="history-list"></div>
    </section>
  </main>
  <script>
    const $ = (id) => document.getElementById(id);
    const CIRCUMFERENCE = 628.32;
    let messageTimer = null;

    const escapeHtml = (text) => String(text)
      .replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;')
      .replace(/"/g, '&quot;').replace(/'/g, '&#39;');

    const setRing = (progress) => {
      $('ring-bar').setAttribute('stroke-dashoffset', (CIRCUMFERENCE * (1 - progress)).toFixed(2));
    };

    const showMessage = (text) => {
      $('message').textContent = text;
      clearTimeout(messageTimer);
      messageTimer = setTimeout(() => { $('message').textContent = ''; }, 4000);
    };

    const renderToday = (today) => {
      $('count').textContent = today.count;
      $('remove-btn').disabled = today.count === 0;
      $('last-log').textContent = today.last_log_time ? `Last recorded ${today.last_log_time}` : '';
      setRing(today.progress);
    };

    const renderSummary = (summary) => {
      renderToday(summary.today);

      const lifetime = summary.lifetime;
      $('lifetime').classList.toggle('hidden', !lifetime);
      if (lifetime) {
        $('life-days').textContent = `${lifetime.life_days_display} days`;
        $('life-days-detail').textContent =
          `of life affected, based on ${lifetime.total_cigarettes_display} cigarettes × 11 min each`;
        $('spend').textContent = lifetime.total_spend_display;
        $('packs').textContent = lifetime.total_packs_display;
      }

      $('insight').classList.toggle('hidden', !summary.insight);
      if (summary.insight) {
        $('insight').textContent =
          `You've logged ${summary.insight.today_count} today. Your average this week is ${summary.insight.active_day_average} per active day.`;
      }

      const anyWeek = summary.week.some((day) => day.count > 0);
      $('week').classList.toggle('hidden', !anyWeek);
      const max = Math.max(1, ...summary.week.map((day) => day.count));
      $('bars').innerHTML = summary.week.map((day) => {
        const height = day.count > 0 ? Math.max(8, (day.count / max) * 80) : 4;
        return `<div class="bar${day.is_today ? ' today' : ''}">` +
          `<span>${day.count || ''}</span><span class="fill" style="height:${height}px"></span>${escapeHtml(day.label)}</div>`;
      }).join('');

      $('risk').classList.toggle('hidden', !summary.high_risk);
      $('setup').classList.toggle('hidden', !summary.show_setup);
      $('setup-prompt').classList.toggle('hidden', !summary.show_setup_prompt);
    };

    const refresh = async () => {
      const response = await fetch('/api/summary');
      if (response.ok) {
        renderSummary(await response.json());
      }
    };

    const el = (tag, className, text) => {
      const node = document.createElement(tag);
      if (className) node.className = className;
      if (text) node.textContent = text;
      return node;
    };

    const renderHistory = async () => {
      const days = await (await fetch('/api/logs')).json();
      const list = $('history-list');
      list.replaceChildren();
      if (!days.length) {
        list.append(el('p', 'hint', 'No entries yet'));
        return;
      }
      days.forEach((day) => {
        const group = el('div', 'history-day');
        group.append(el('h4', '', day.date));
        day.entries.forEach((entry) => {
          const row = el('div', 'history-item');
          const text = el('div', '', entry.time);
          if (entry.details) text.append(el('small', '', entry.details));
          if (entry.notes) text.append(el('small', 'notes', entry.notes));
          const remove = el('button', 'delete', '✕');
          remove.type = 'button';
          remove.dataset.id = entry.id;
          row.append(text, remove);
          group.append(row);
        });
        list.append(group);
      });
    };

    $('add-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const response = await fetch('/api/logs', { method: 'POST' });
      if (response.ok) {
        const data = await response.json();
        showMessage(data.message);
        document.querySelectorAll('.chip.on').forEach((chip) => chip.classList.remove('on'));
        $('notes').value = '';
        await refresh();
      }
    });

    $('remove-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      await fetch('/api/logs/remove-last', { method: 'POST' });
      await refresh();
    });

    $('details-toggle').addEventListener('click', () => {
      $('details-body').classList.remove('hidden');
      $('details-toggle').classList.add('hidden');
    });

    const patchDraft = (patch) => fetch('/api/draft', {
      method: 'PATCH',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(patch)
    });

    document.querySelectorAll('.chips').forEach((group) => {
      const field = group.dataset.field;
      group.innerHTML = group.dataset.options.split('|')
        .map((option) => `<button class="chip" type="button">${option}</button>`).join('');
      group.addEventListener('click', (event) => {
        const chip = event.target.closest('.chip');
        if (!chip) return;
        const selecting = !chip.classList.contains('on');
        group.querySelectorAll('.chip').forEach((other) => other.classList.remove('on'));
        chip.classList.toggle('on', selecting);
        patchDraft({ [field]: selecting ? chip.textContent : null });
      });
    });

    $('notes').addEventListener('change', () => patchDraft({ notes: $('notes').value }));

    $('history-btn').addEventListener('click', async () => {
      const hidden = $('history').classList.toggle('hidden');
      if (!hidden) await renderHistory();
    });

    $('history-list').addEventListener('click', async (event) => {
      const button = event.target.closest('.delete');
      if (!button) return;
      await fetch(`/api/logs/${encodeURIComponent(button.dataset.id)}`, { method: 'DELETE' });
      await renderHistory();
      await refresh();
    });

    const months = ['January', 'February', 'March', 'April', 'May', 'June', 'July',
      'August', 'September', 'October', 'November', 'December'];
    $('start-month').innerHTML = months.map((name, i) => `<option value="${i + 1}">${name}</option>`).join('');
    $('start-year').value = new Date().getFullYear() - 5;

    $('setup-save').addEventListener('click', async () => {
      const profile = {
        startMonth: Number($('start-month').value),
        startYear: Number($('start-year').value),
        avgPerDay: Number($('avg').value),
        perPack: Number($('per-pack').value),
        costPerCig: Number($('cost').value)
      };
      const response = await fetch('/api/profile', {
        method: 'PUT',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(profile)
      });
      $('setup-error').textContent = response.ok ? '' : await response.text();
      await refresh();
    });

    $('setup-skip').addEventListener('click', async () => {
      await fetch('/api/setup/dismiss', { method: 'POST' });
      await refresh();
    });

    $('setup-prompt').addEventListener('click', () => {
      $('setup').classList.remove('hidden');
      $('setup-prompt').classList.add('hidden');
    });

    setRing(Number($('ring-bar').dataset.progress));
    if ($('last-log').dataset.last) {
      $('last-log').textContent = `Last recorded ${$('last-log').dataset.last}`;
    }
    refresh();
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_today_into_page() {
        let html = render_index(&TodayResponse {
            date: "2026-01-05".into(),
            count: 7,
            last_log_at: Some(0),
            last_log_time: Some("09:15".into()),
            progress: 0.35,
        });
        assert!(html.contains(r#"<span id="count" class="ring-count">7</span>"#));
        assert!(html.contains(r#"data-last="09:15""#));
        assert!(html.contains(r#"data-progress="0.350""#));
        assert!(html.contains("Today, 2026-01-05"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn history_text_is_never_parsed_as_markup() {
        let html = render_index(&TodayResponse {
            date: "2026-01-05".into(),
            count: 0,
            last_log_at: None,
            last_log_time: None,
            progress: 0.0,
        });
        for field in ["day.date", "entry.time", "entry.details", "entry.notes", "entry.id"] {
            assert!(!html.contains(&format!("${{{field}}}")), "{field} interpolated into markup");
        }
        assert!(html.contains("el('small', '', entry.details)"));
        assert!(html.contains("el('small', 'notes', entry.notes)"));
        assert!(html.contains("node.textContent = text"));
        assert!(html.contains("escapeHtml(day.label)"));
    }
}
