use crate::models::TallyData;
use crate::store::level_for;

pub fn render_index(data: &TallyData) -> String {
    INDEX_HTML
        .replace("{{THEME}}", if data.dark_mode { "dark" } else { "" })
        .replace("{{PHRASE}}", &escape_html(&data.current_phrase))
        .replace("{{COUNT}}", &data.current_count.to_string())
        .replace("{{TARGET}}", &data.target_count.to_string())
        .replace("{{LEVEL}}", &level_for(data.points).to_string())
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en" class="{{THEME}}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Phrase Tally</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --muted: #6b645d;
      --card: rgba(255, 255, 255, 0.86);
      --tile: white;
      --border: rgba(47, 72, 88, 0.08);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    html.dark {
      --bg-1: #191c22;
      --bg-2: #232a36;
      --ink: #e8e4dc;
      --accent: #ff8a6b;
      --accent-2: #9cc2d8;
      --muted: #9a948c;
      --card: rgba(30, 34, 42, 0.92);
      --tile: #232831;
      --border: rgba(156, 194, 216, 0.12);
      --shadow: 0 24px 60px rgba(0, 0, 0, 0.45);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), var(--bg-2) 130%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(880px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    header h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    .subtitle {
      margin: 6px 0 0;
      color: var(--muted);
      font-size: 1rem;
    }

    .counter-card {
      background: var(--tile);
      border: 1px solid var(--border);
      border-radius: 20px;
      padding: 28px;
      display: grid;
      gap: 18px;
      text-align: center;
    }

    .counter-card select,
    .counter-card input {
      font: inherit;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid var(--border);
      background: var(--tile);
      color: var(--ink);
    }

    .count-display {
      font-family: "Fraunces", "Georgia", serif;
      font-size: clamp(3.2rem, 9vw, 5rem);
      line-height: 1;
      color: var(--accent-2);
    }

    .count-display .of-target {
      font-size: 1.1rem;
      color: var(--muted);
      font-family: "Space Grotesk", sans-serif;
    }

    .phrase-row, .target-row {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      justify-content: center;
      align-items: center;
    }

    .actions {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 14px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      transition: transform 150ms ease;
    }

    button:active {
      transform: scale(0.98);
    }

    .btn-count {
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(255, 107, 74, 0.3);
    }

    .btn-save {
      background: var(--accent-2);
      color: var(--bg-1);
    }

    .btn-quiet {
      background: transparent;
      border: 1px solid var(--border);
      color: var(--muted);
    }

    .btn-danger {
      background: #c63b2b;
      color: white;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 14px;
    }

    .stat {
      background: var(--tile);
      border-radius: 18px;
      padding: 16px;
      border: 1px solid var(--border);
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    h2 {
      margin: 0;
      font-size: 1.3rem;
    }

    .chart-card {
      background: var(--tile);
      border-radius: 20px;
      padding: 16px;
      border: 1px solid var(--border);
    }

    #chart {
      width: 100%;
      height: 240px;
      display: block;
    }

    #chart text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-point {
      fill: var(--tile);
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: var(--border);
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .goal-bar {
      height: 8px;
      border-radius: 999px;
      background: var(--border);
      overflow: hidden;
    }

    .goal-bar span {
      display: block;
      height: 100%;
      background: var(--accent);
      width: 0;
      transition: width 300ms ease;
    }

    .goal-row {
      display: grid;
      gap: 8px;
      background: var(--tile);
      border: 1px solid var(--border);
      border-radius: 18px;
      padding: 16px;
    }

    .goal-row .meta {
      display: flex;
      justify-content: space-between;
      font-size: 0.9rem;
      color: var(--muted);
    }

    .goals-edit {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      align-items: center;
    }

    .goals-edit input {
      width: 110px;
      font: inherit;
      padding: 8px 10px;
      border-radius: 10px;
      border: 1px solid var(--border);
      background: var(--tile);
      color: var(--ink);
    }

    .settings {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 12px;
    }

    .setting {
      background: var(--tile);
      border: 1px solid var(--border);
      border-radius: 14px;
      padding: 14px 16px;
      display: flex;
      justify-content: space-between;
      align-items: center;
      cursor: pointer;
    }

    .tools {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
    }

    .status {
      font-size: 0.95rem;
      color: var(--muted);
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
      button {
        width: 100%;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Phrase Tally</h1>
      <p class="subtitle">Count a phrase, keep the streak of days honest, level up as the points add together.</p>
    </header>

    <section class="counter-card">
      <div class="phrase-row">
        <label for="phrase">Phrase</label>
        <select id="phrase"><option selected>{{PHRASE}}</option></select>
      </div>
      <div class="count-display">
        <span id="count">{{COUNT}}</span>
        <div class="of-target">of <span id="target-label">{{TARGET}}</span> &middot; level <span id="level">{{LEVEL}}</span></div>
      </div>
      <div class="actions">
        <button class="btn-count" id="count-btn" type="button">Count +1</button>
        <button class="btn-save" id="save-btn" type="button">Save session</button>
        <button class="btn-quiet" id="reset-btn" type="button">Reset</button>
      </div>
      <div class="target-row">
        <label for="target">Session target</label>
        <input id="target" type="number" min="1" value="{{TARGET}}" />
        <button class="btn-quiet" id="target-btn" type="button">Set</button>
      </div>
    </section>

    <section class="panel">
      <div class="stat">
        <span class="label">Today</span>
        <span class="value" id="today-total">0</span>
      </div>
      <div class="stat">
        <span class="label">This week</span>
        <span class="value" id="weekly-total">0</span>
      </div>
      <div class="stat">
        <span class="label">This month</span>
        <span class="value" id="monthly-total">0</span>
      </div>
      <div class="stat">
        <span class="label">Best day</span>
        <span class="value" id="best-day">--</span>
      </div>
      <div class="stat">
        <span class="label">Points</span>
        <span class="value" id="points">0</span>
      </div>
    </section>

    <section class="chart-area">
      <h2>Last 7 days</h2>
      <div class="chart-card">
        <svg id="chart" viewBox="0 0 600 240" aria-label="Daily totals chart" role="img"></svg>
      </div>
    </section>

    <section>
      <h2>Goals</h2>
      <div class="panel">
        <div class="goal-row">
          <div class="meta"><span>Daily goal</span><span id="daily-goal-meta">0 / 0</span></div>
          <div class="goal-bar"><span id="daily-goal-bar"></span></div>
        </div>
        <div class="goal-row">
          <div class="meta"><span>Weekly goal</span><span id="weekly-goal-meta">0 / 0</span></div>
          <div class="goal-bar"><span id="weekly-goal-bar"></span></div>
        </div>
      </div>
      <div class="goals-edit">
        <label for="daily-goal">Daily</label>
        <input id="daily-goal" type="number" />
        <label for="weekly-goal">Weekly</label>
        <input id="weekly-goal" type="number" />
        <button class="btn-quiet" id="goals-btn" type="button">Save goals</button>
      </div>
    </section>

    <section>
      <h2>Settings</h2>
      <div class="settings">
        <label class="setting"><span>Sound</span><input id="sound" type="checkbox" data-toggle="sound" /></label>
        <label class="setting"><span>Vibration</span><input id="vibration" type="checkbox" data-toggle="vibration" /></label>
        <label class="setting"><span>Dark mode</span><input id="dark-mode" type="checkbox" data-toggle="dark-mode" /></label>
        <label class="setting"><span>Notifications</span><input id="notifications" type="checkbox" data-toggle="notifications" /></label>
      </div>
    </section>

    <section>
      <h2>Data</h2>
      <div class="tools">
        <button class="btn-quiet" id="export-btn" type="button">Export</button>
        <button class="btn-quiet" id="import-btn" type="button">Import</button>
        <input id="import-file" type="file" accept="application/json" hidden />
        <button class="btn-danger" id="wipe-btn" type="button">Clear all data</button>
      </div>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const PHRASES = ['Gratitude', 'Patience', 'Focus', 'Kindness', 'Calm', 'Courage'];

    const countEl = document.getElementById('count');
    const targetLabelEl = document.getElementById('target-label');
    const levelEl = document.getElementById('level');
    const phraseEl = document.getElementById('phrase');
    const targetEl = document.getElementById('target');
    const statusEl = document.getElementById('status');
    const chartEl = document.getElementById('chart');

    let state = null;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const playTone = () => {
      if (!('AudioContext' in window)) {
        return;
      }
      const ctx = new AudioContext();
      const oscillator = ctx.createOscillator();
      const gain = ctx.createGain();
      oscillator.connect(gain);
      gain.connect(ctx.destination);
      oscillator.frequency.value = 800;
      oscillator.type = 'sine';
      gain.gain.setValueAtTime(0.3, ctx.currentTime);
      gain.gain.exponentialRampToValueAtTime(0.01, ctx.currentTime + 0.1);
      oscillator.start(ctx.currentTime);
      oscillator.stop(ctx.currentTime + 0.1);
    };

    const vibrate = () => {
      if (navigator.vibrate) {
        navigator.vibrate(50);
      }
    };

    const applyTheme = (dark) => {
      document.documentElement.classList.toggle('dark', dark);
    };

    const fillPhrases = (current) => {
      const names = PHRASES.includes(current) ? PHRASES : [current, ...PHRASES];
      phraseEl.innerHTML = names
        .map((name) => `<option${name === current ? ' selected' : ''}>${name}</option>`)
        .join('');
    };

    const applyState = (next) => {
      state = next;
      countEl.textContent = next.current_count;
      targetLabelEl.textContent = next.target_count;
      targetEl.value = next.target_count;
      levelEl.textContent = next.level;
      fillPhrases(next.current_phrase);
      document.getElementById('sound').checked = next.sound_enabled;
      document.getElementById('vibration').checked = next.vibration_enabled;
      document.getElementById('dark-mode').checked = next.dark_mode;
      document.getElementById('notifications').checked = next.notifications;
      document.getElementById('daily-goal').value = next.daily_goal;
      document.getElementById('weekly-goal').value = next.weekly_goal;
      document.getElementById('points').textContent = next.points;
      applyTheme(next.dark_mode);
    };

    const applyCounter = (counter) => {
      state = Object.assign({}, state, counter);
      countEl.textContent = counter.current_count;
      targetLabelEl.textContent = counter.target_count;
      levelEl.textContent = counter.level;
      document.getElementById('points').textContent = counter.points;
    };

    const renderGoal = (progress, barId, metaId) => {
      const goal = Math.max(progress.goal, 0);
      const share = goal > 0 ? Math.min(progress.total / goal, 1) : 1;
      document.getElementById(barId).style.width = `${(share * 100).toFixed(0)}%`;
      document.getElementById(metaId).textContent =
        `${progress.total} / ${progress.goal} (${progress.remaining} to go)`;
    };

    const renderChart = (points) => {
      const width = 600;
      const height = 240;
      const paddingX = 44;
      const paddingY = 34;
      const top = 20;

      const values = points.map((point) => point.total_count);
      const max = Math.max(...values, 1);
      const xStep = (width - paddingX * 2) / (points.length - 1);
      const scaleY = (height - top - paddingY) / max;
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - value * scaleY;

      const path = points
        .map((point, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(point.total_count).toFixed(2)}`)
        .join(' ');

      let grid = '';
      const ticks = 4;
      for (let i = 0; i <= ticks; i += 1) {
        const value = (max * i) / ticks;
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${Math.round(value)}</text>`;
      }

      const labels = points
        .map((point, index) =>
          `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${point.date.slice(5)}</text>`)
        .join('');

      const circles = points
        .map((point, index) => `<circle class="chart-point" cx="${x(index)}" cy="${y(point.total_count)}" r="4" />`)
        .join('');

      chartEl.innerHTML = `${grid}<path class="chart-line" d="${path}" />${circles}${labels}`;
    };

    const request = async (path, options) => {
      const res = await fetch(path, options);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const post = (path, body) =>
      request(path, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body)
      });

    const loadState = async () => {
      applyState(await request('/api/state'));
    };

    const loadStats = async () => {
      const stats = await request('/api/stats');
      document.getElementById('today-total').textContent = stats.today_total;
      document.getElementById('weekly-total').textContent = stats.weekly_total;
      document.getElementById('monthly-total').textContent = stats.monthly_total;
      document.getElementById('best-day').textContent =
        stats.best_day ? `${stats.best_day.count} (${stats.best_day.date})` : '--';
      renderGoal(stats.daily_goal, 'daily-goal-bar', 'daily-goal-meta');
      renderGoal(stats.weekly_goal, 'weekly-goal-bar', 'weekly-goal-meta');
      renderChart(stats.last_7_days);
    };

    const refresh = () => Promise.all([loadState(), loadStats()]);

    document.getElementById('count-btn').addEventListener('click', async () => {
      // device feedback fires only while the session is still under
      // target, judged on the count before this press
      if (state && state.current_count < state.target_count) {
        if (state.sound_enabled) playTone();
        if (state.vibration_enabled) vibrate();
      }
      try {
        applyCounter(await post('/api/increment'));
        loadStats().catch((err) => setStatus(err.message, 'error'));
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.getElementById('save-btn').addEventListener('click', async () => {
      try {
        const result = await post('/api/session/save');
        setStatus(result.saved ? 'Session saved' : 'Nothing to save yet', result.saved ? 'ok' : '');
        await refresh();
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.getElementById('reset-btn').addEventListener('click', async () => {
      try {
        applyCounter(await post('/api/reset'));
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    phraseEl.addEventListener('change', async () => {
      try {
        applyCounter(await post('/api/phrase', { phrase: phraseEl.value }));
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.getElementById('target-btn').addEventListener('click', async () => {
      try {
        applyCounter(await post('/api/target', { target: Number(targetEl.value) }));
        setStatus('Target updated', 'ok');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.getElementById('goals-btn').addEventListener('click', async () => {
      try {
        await post('/api/goals', {
          daily: Number(document.getElementById('daily-goal').value),
          weekly: Number(document.getElementById('weekly-goal').value)
        });
        setStatus('Goals updated', 'ok');
        await loadStats();
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.querySelectorAll('[data-toggle]').forEach((input) => {
      input.addEventListener('change', async () => {
        try {
          const result = await post(`/api/settings/${input.dataset.toggle}`);
          input.checked = result.enabled;
          if (input.dataset.toggle === 'dark-mode') {
            applyTheme(result.enabled);
          }
          if (state) {
            await loadState();
          }
        } catch (err) {
          setStatus(err.message, 'error');
        }
      });
    });

    document.getElementById('export-btn').addEventListener('click', async () => {
      try {
        const snapshot = await request('/api/export');
        const blob = new Blob([JSON.stringify(snapshot, null, 2)], { type: 'application/json' });
        const link = document.createElement('a');
        link.href = URL.createObjectURL(blob);
        link.download = 'phrase-tally.json';
        link.click();
        URL.revokeObjectURL(link.href);
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.getElementById('import-btn').addEventListener('click', () => {
      document.getElementById('import-file').click();
    });

    document.getElementById('import-file').addEventListener('change', async (event) => {
      const file = event.target.files[0];
      if (!file) {
        return;
      }
      try {
        const snapshot = JSON.parse(await file.text());
        await post('/api/import', snapshot);
        setStatus('Data imported', 'ok');
        await refresh();
      } catch (err) {
        setStatus(err.message, 'error');
      } finally {
        event.target.value = '';
      }
    });

    document.getElementById('wipe-btn').addEventListener('click', async () => {
      if (!window.confirm('Delete all counting data? This cannot be undone.')) {
        return;
      }
      try {
        await post('/api/wipe');
        setStatus('All data cleared', 'ok');
        await refresh();
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    refresh().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
