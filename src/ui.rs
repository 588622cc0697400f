use crate::models::StatKind;

pub fn render_index(stats: &[StatKind]) -> String {
    let options: String = stats
        .iter()
        .map(|stat| format!(r#"<option value="{}">{}</option>"#, stat.key(), stat.label()))
        .collect();
    INDEX_HTML.replace("{{STAT_OPTIONS}}", &options)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Covid-19</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef3f6;
      --bg-2: #c9dbe6;
      --ink: #1f2a30;
      --accent: #d9483b;
      --accent-2: #24506b;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(36, 80, 107, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #dde9f0 60%, #f4f7f9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1100px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    header {
      display: flex;
      flex-direction: column;
      gap: 6px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    h2 {
      margin: 0;
      font-size: 1.1rem;
    }

    .subtitle {
      margin: 0;
      color: #56636b;
      font-size: 1rem;
    }

    nav {
      display: flex;
      flex-wrap: wrap;
      align-items: end;
      gap: 16px;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #7b868d;
    }

    select {
      appearance: none;
      border: 1px solid rgba(36, 80, 107, 0.2);
      border-radius: 999px;
      padding: 10px 18px;
      font: inherit;
      font-size: 1rem;
      color: var(--ink);
      background: white;
      min-width: 200px;
    }

    .row {
      display: grid;
      grid-template-columns: minmax(220px, 3fr) 7fr;
      gap: 16px;
    }

    .cards {
      display: grid;
      gap: 16px;
      align-content: start;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(36, 80, 107, 0.08);
      display: grid;
      gap: 10px;
    }

    .stat .item {
      display: flex;
      justify-content: space-between;
      gap: 12px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #7b868d;
    }

    .stat .value {
      font-size: 1.3rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      border: 1px solid rgba(36, 80, 107, 0.08);
      display: grid;
      gap: 8px;
    }

    .chart {
      width: 100%;
      height: 280px;
      display: block;
    }

    .chart text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(36, 80, 107, 0.12);
    }

    .chart-label {
      fill: #6d787f;
      font-size: 11px;
    }

    .status {
      font-size: 0.95rem;
      color: #56636b;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .app[data-state="failed"] .row,
    .app[data-state="failed"] nav {
      display: none;
    }

    .hint {
      margin: 0;
      color: #6a757c;
      font-size: 0.9rem;
    }

    @media (max-width: 760px) {
      .app {
        padding: 28px 22px;
      }
      .row {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app" id="app" data-state="loading">
    <header>
      <h1>Covid-19</h1>
      <p class="subtitle">Stats visualizer for Covid-19</p>
    </header>

    <nav>
      <label>Country
        <select id="country" disabled></select>
      </label>
      <label>Select Stat
        <select id="stat" disabled>{{STAT_OPTIONS}}</select>
      </label>
    </nav>

    <section class="row">
      <div class="cards">
        <div class="stat">
          <h2 id="country-daily-title">Daily figures</h2>
          <div class="item"><span class="label">Daily confirmed</span><span class="value" id="country-daily-confirmed">--</span></div>
          <div class="item"><span class="label">Daily deaths</span><span class="value" id="country-daily-deaths">--</span></div>
        </div>
        <div class="stat">
          <h2>Daily figures in World</h2>
          <div class="item"><span class="label">Daily confirmed</span><span class="value" id="global-daily-confirmed">--</span></div>
          <div class="item"><span class="label">Daily deaths</span><span class="value" id="global-daily-deaths">--</span></div>
        </div>
      </div>
      <div class="chart-card">
        <h2>Daily count</h2>
        <svg class="chart" id="daily-chart" viewBox="0 0 700 280" aria-label="Daily count chart" role="img"></svg>
      </div>
    </section>

    <section class="row">
      <div class="cards">
        <div class="stat">
          <h2 id="country-total-title">Total figures</h2>
          <div class="item"><span class="label">Total confirmed</span><span class="value" id="country-total-confirmed">--</span></div>
          <div class="item"><span class="label">Total deaths</span><span class="value" id="country-total-deaths">--</span></div>
        </div>
        <div class="stat">
          <h2>Total figures in World</h2>
          <div class="item"><span class="label">Total confirmed</span><span class="value" id="global-total-confirmed">--</span></div>
          <div class="item"><span class="label">Total deaths</span><span class="value" id="global-total-deaths">--</span></div>
        </div>
      </div>
      <div class="chart-card">
        <h2>Total count</h2>
        <svg class="chart" id="total-chart" viewBox="0 0 700 280" aria-label="Total count chart" role="img"></svg>
      </div>
    </section>

    <div class="status" id="status">Loading...</div>
    <p class="hint" id="range"></p>
  </main>

  <script>
    const appEl = document.getElementById('app');
    const countryEl = document.getElementById('country');
    const statEl = document.getElementById('stat');
    const statusEl = document.getElementById('status');
    const rangeEl = document.getElementById('range');
    const dailyChartEl = document.getElementById('daily-chart');
    const totalChartEl = document.getElementById('total-chart');

    let sessionId = null;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const setText = (id, value) => {
      document.getElementById(id).textContent =
        typeof value === 'number' ? value.toLocaleString() : value;
    };

    const formatAxisValue = (value) => {
      const abs = Math.abs(value);
      if (abs >= 1e6) {
        return `${(value / 1e6).toFixed(1)}M`;
      }
      if (abs >= 1e3) {
        return `${(value / 1e3).toFixed(1)}k`;
      }
      return Math.round(value).toString();
    };

    const renderLineChart = (chartEl, points) => {
      if (!points.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data</text>';
        return;
      }

      const width = 700;
      const height = 280;
      const paddingX = 52;
      const paddingY = 34;
      const top = 20;

      const values = points.map((point) => point.count);
      let min = Math.min(0, ...values);
      let max = Math.max(0, ...values);
      if (min === max) {
        max += 1;
      }

      const range = max - min;
      const xStep = points.length > 1 ? (width - paddingX * 2) / (points.length - 1) : 0;
      const scaleY = (height - top - paddingY) / range;
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - (value - min) * scaleY;

      const path = points
        .map((point, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(point.count).toFixed(2)}`)
        .join(' ');

      const ticks = 4;
      let grid = '';
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + (range * i) / ticks;
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 8}" y="${yPos + 4}" text-anchor="end">${formatAxisValue(value)}</text>`;
      }

      const labelEvery = Math.max(1, Math.ceil(points.length / 6));
      const xLabels = points
        .map((point, index) => {
          if (index % labelEvery !== 0) {
            return '';
          }
          return `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${point.date.slice(0, 10)}</text>`;
        })
        .join('');

      const circles = points.length > 31 ? '' : points
        .map((point, index) => `<circle class="chart-point" cx="${x(index)}" cy="${y(point.count)}" r="3" />`)
        .join('');

      chartEl.innerHTML = `
        ${grid}
        <path class="chart-line" d="${path}" />
        ${circles}
        ${xLabels}
      `;
    };

    const fillCountries = (countries, selected) => {
      countryEl.replaceChildren(
        ...countries.map((country) => {
          const option = document.createElement('option');
          option.value = country;
          option.textContent = country;
          return option;
        })
      );
      countryEl.value = selected;
    };

    const render = (view) => {
      countryEl.value = view.selected_country;
      statEl.value = view.selected_stat;

      setText('country-daily-title', `Daily figures in ${view.series_country}`);
      setText('country-daily-confirmed', view.latest.confirmed_daily);
      setText('country-daily-deaths', view.latest.deaths_daily);
      setText('country-total-title', `Total figures in ${view.series_country}`);
      setText('country-total-confirmed', view.latest.confirmed);
      setText('country-total-deaths', view.latest.deaths);
      setText('global-daily-confirmed', view.global_daily.confirmed);
      setText('global-daily-deaths', view.global_daily.deaths);
      setText('global-total-confirmed', view.global_totals.confirmed);
      setText('global-total-deaths', view.global_totals.deaths);

      renderLineChart(dailyChartEl, view.daily_series);
      renderLineChart(totalChartEl, view.cumulative_series);
      rangeEl.textContent = `Data from ${view.first_date.slice(0, 10)} to ${view.last_date.slice(0, 10)}. World figures are for ${view.last_date.slice(0, 10)}.`;

      if (view.notice) {
        setStatus(view.notice, 'error');
      } else {
        setStatus('', '');
      }
    };

    const send = async (path, body, retried = false) => {
      const res = await fetch(`/api/sessions/${sessionId}/${path}`, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body)
      });
      if (res.status === 404 && !retried) {
        // Session expired or was ended; open a new one and replay the change.
        await start();
        return send(path, body, true);
      }
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      render(await res.json());
    };

    const start = async () => {
      const res = await fetch('/api/sessions', { method: 'POST' });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Unable to load Covid-19 data');
      }
      const { id, view } = await res.json();
      sessionId = id;
      fillCountries(view.countries, view.selected_country);
      countryEl.disabled = false;
      statEl.disabled = false;
      appEl.dataset.state = 'ready';
      render(view);
    };

    countryEl.addEventListener('change', () => {
      setStatus('Loading...', 'info');
      send('country', { country: countryEl.value }).catch((err) => setStatus(err.message, 'error'));
    });

    statEl.addEventListener('change', () => {
      send('stat', { stat: statEl.value }).catch((err) => setStatus(err.message, 'error'));
    });

    window.addEventListener('pagehide', (event) => {
      if (sessionId && !event.persisted) {
        fetch(`/api/sessions/${sessionId}`, { method: 'DELETE', keepalive: true });
      }
    });

    window.addEventListener('pageshow', (event) => {
      if (event.persisted) {
        sessionId = null;
        start().catch((err) => {
          appEl.dataset.state = 'failed';
          setStatus(`Could not start the dashboard: ${err.message}`, 'error');
        });
      }
    });

    start().catch((err) => {
      appEl.dataset.state = 'failed';
      setStatus(`Could not start the dashboard: ${err.message}`, 'error');
    });
  </script>
</body>
</html>
"#;
