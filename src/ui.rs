//! Single-page form served at `/`

pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>AI Movie Scripting Agent</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
    label { display: block; margin-top: 1rem; font-weight: 600; }
    textarea, select, input[type=range] { width: 100%; }
    textarea { min-height: 6rem; }
    button { margin-top: 1.5rem; padding: .6rem 1.2rem; }
    .caption, .limits { color: #666; }
    .error { background: #fdecea; border-left: 4px solid #d93025; padding: .8rem; margin-top: 1rem; }
    #output { white-space: pre-wrap; margin-top: 1.5rem; }
    pre { background: #f5f5f5; padding: .8rem; overflow-x: auto; }
  </style>
</head>
<body>
  <h1>AI Movie Scripting Agent</h1>
  <p class="caption">Punch in your plot idea, I'll generate a full movie script for you.</p>
  <p class="limits" id="limits"></p>

  <form id="script-form">
    <label for="idea">Describe what's cooking in your mind. A few sentences will do!</label>
    <textarea id="idea" name="idea"></textarea>

    <label for="genre">Choose the movie genre</label>
    <select id="genre" name="genre"></select>

    <label for="audience">Who's watching?</label>
    <select id="audience" name="audience"></select>

    <label for="runtime">How long's the runtime (in minutes)? <span id="runtime-value"></span></label>
    <input type="range" id="runtime" name="runtime">

    <label><input type="checkbox" id="show-details"> Show technical error details</label>

    <button type="submit" id="submit">Generate Script</button>
  </form>

  <div id="output"></div>

  <script>
    const $ = (id) => document.getElementById(id);

    function fill(select, values) {
      select.innerHTML = values.map((v) => `<option>${v}</option>`).join("");
    }

    async function loadOptions() {
      const res = await fetch("/api/options");
      const { data } = await res.json();
      fill($("genre"), data.genres);
      fill($("audience"), data.audiences);
      const runtime = $("runtime");
      runtime.min = data.runtime.min;
      runtime.max = data.runtime.max;
      runtime.value = data.runtime.default;
      $("runtime-value").textContent = runtime.value;
      runtime.oninput = () => { $("runtime-value").textContent = runtime.value; };
      $("limits").textContent =
        `Usage limits: ${data.advisory_limits.requests_per_minute} requests/minute, ` +
        `${data.advisory_limits.requests_per_day} requests/day.`;
    }

    function text(tag, value, className) {
      const el = document.createElement(tag);
      el.textContent = value;
      if (className) el.className = className;
      return el;
    }

    function render(out, rendered) {
      out.replaceChildren();
      if (rendered.kind === "content") {
        out.appendChild(text("div", rendered.text));
        return;
      }
      out.appendChild(text("div", rendered.message, "error"));
      if (rendered.detail) {
        const details = document.createElement("details");
        details.appendChild(text("summary", "Technical details"));
        details.appendChild(text("pre", rendered.detail.body));
        out.appendChild(details);
      }
    }

    $("script-form").onsubmit = async (event) => {
      event.preventDefault();
      const out = $("output");
      $("submit").disabled = true;
      out.replaceChildren(text("p", "Scripting your cool idea..."));
      try {
        const res = await fetch("/api/script", {
          method: "POST",
          headers: { "content-type": "application/json" },
          body: JSON.stringify({
            idea: $("idea").value,
            genre: $("genre").value,
            audience: $("audience").value,
            runtime: Number($("runtime").value),
            show_error_details: $("show-details").checked,
          }),
        });
        const body = await res.json();
        if (body.success) {
          render(out, body.data);
        } else {
          out.replaceChildren(text("div", body.error, "error"));
        }
      } catch (err) {
        out.replaceChildren(text("div", String(err), "error"));
      } finally {
        $("submit").disabled = false;
      }
    };

    loadOptions();
  </script>
</body>
</html>
"#;
