//! The upload page served at `/`.
//!
//! The page holds the Idle/Processing cycle: picking a file shows it as
//! ready, "Convert to MP4" posts it and disables itself until the server
//! answers with either the MP4 (offered through a download link) or an
//! error envelope whose message is shown verbatim.

use axum::response::Html;

pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>MKV to MP4 Converter</title>
<meta name="viewport" content="width=device-width, initial-scale=1">
</head>
<body>
<main>
  <h1>MKV to MP4 Converter</h1>
  <form id="upload">
    <label for="file"><strong>Upload your MKV file</strong></label><br>
    <input id="file" name="file" type="file" accept=".mkv">
    <p id="ready" hidden></p>
    <button id="convert" type="submit" hidden>Convert to MP4</button>
  </form>
  <p id="status" role="status"></p>
  <pre id="error" hidden></pre>
  <a id="download" hidden>Download MP4</a>
</main>
<script>
const form = document.getElementById("upload");
const input = document.getElementById("file");
const ready = document.getElementById("ready");
const button = document.getElementById("convert");
const status = document.getElementById("status");
const error = document.getElementById("error");
const download = document.getElementById("download");

function reset() {
  status.textContent = "";
  error.hidden = true;
  error.textContent = "";
  download.hidden = true;
  if (download.href) URL.revokeObjectURL(download.href);
  download.removeAttribute("href");
}

input.addEventListener("change", () => {
  reset();
  const file = input.files[0];
  ready.hidden = !file;
  button.hidden = !file;
  ready.textContent = file ? "File ready: " + file.name : "";
});

form.addEventListener("submit", async (event) => {
  event.preventDefault();
  const file = input.files[0];
  if (!file) return;
  reset();
  button.disabled = true;
  status.textContent = "Converting...";
  try {
    const body = new FormData();
    body.append("file", file, file.name);
    const resp = await fetch("/api/v1/convert", { method: "POST", body });
    if (!resp.ok) {
      let message = resp.statusText;
      try {
        message = (await resp.json()).error.message;
      } catch (_) {}
      throw new Error(message);
    }
    const blob = await resp.blob();
    const name = file.name.includes(".")
      ? file.name.slice(0, file.name.lastIndexOf(".")) + ".mp4"
      : file.name + ".mp4";
    download.href = URL.createObjectURL(blob);
    download.download = name;
    download.hidden = false;
    status.textContent = "Conversion completed!";
  } catch (e) {
    status.textContent = "";
    error.textContent = "Error: " + e.message;
    error.hidden = false;
  } finally {
    button.disabled = false;
  }
});
</script>
</body>
</html>
"#;

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
