//! Page template

pub const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>🧘 Mental Wellness Reflection Bot</title>
<style>
body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; color: #1f2933; }
textarea { width: 100%; min-height: 9rem; font: inherit; }
select, button { font: inherit; }
.notice { padding: .75rem 1rem; border-radius: .4rem; margin: 1rem 0; white-space: pre-wrap; }
.info { background: #e8f1fb; }
.warning { background: #fff4d6; }
.error { background: #fde2e1; }
.success { background: #e3f6e8; }
.actions { display: flex; gap: .75rem; margin-top: .75rem; }
details { border-bottom: 1px solid #d9e2ec; padding: .5rem 0; }
details p { white-space: pre-wrap; }
footer { margin-top: 2rem; color: #52606d; }
</style>
</head>
<body>
<h1>🧘 Mental Wellness Reflection Bot</h1>
<h3>Your daily companion for mindful reflection and gentle insights.</h3>

<form method="post" action="/reflect">
  <label for="question">💬 Choose a Reflection Question or get a random one:</label><br>
  <select id="question" name="question">
  {%- for option in questions %}
    <option value="{{ option.value }}"{% if option.selected %} selected{% endif %}>{{ option.value }}</option>
  {%- endfor %}
  </select>
  <button type="submit" formaction="/reflect/question">Use question</button>

  {% if random_notice %}<div class="notice info">You got a random question: <strong>{{ random_notice }}</strong></div>{% endif %}
  <p><strong>Your chosen question:</strong> <em>{{ question }}</em></p>

  <label for="draft">✍️ Write your reflection here (aim for at least a few sentences for better feedback):</label>
  <textarea id="draft" name="draft">{{ draft }}</textarea>
  {% if draft_chars > 0 %}<p>Characters: {{ draft_chars }}</p>{% endif %}

  <label for="style">🎨 Feedback style:</label>
  <select id="style" name="style">
  {%- for option in styles %}
    <option value="{{ option.slug }}"{% if option.selected %} selected{% endif %}>{{ option.label }}</option>
  {%- endfor %}
  </select>

  <div class="actions">
    <button type="submit">✨ Get Feedback</button>
    <button type="submit" formaction="/reset">🔄 Clear Reflection</button>
  </div>
</form>

{% if notice %}
  {% if notice.level == "success" %}
  <div class="notice success">📝 Here's some personalized feedback for you:</div>
  <div class="notice info">{{ notice.message }}</div>
  <hr>
  <p>Remember, your well-being journey is unique. Take what resonates with you!</p>
  {% else %}
  <div class="notice {{ notice.level }}">{{ notice.message }}</div>
  {% if notice.hint %}<div class="notice warning">{{ notice.hint }}</div>{% endif %}
  {% endif %}
{% endif %}

{% if journal %}
<h2>📔 Your reflection journal</h2>
{%- for entry in journal %}
<details>
  <summary>{{ entry.heading }}</summary>
  <p><strong>Question:</strong> {{ entry.question }}</p>
  <p><strong>Your reflection:</strong> {{ entry.reflection }}</p>
  <p><strong>Feedback ({{ entry.style }}):</strong> {{ entry.feedback }}</p>
</details>
{%- endfor %}
{% endif %}

<hr>
<footer>Made with ❤️ for your mental wellness.</footer>
</body>
</html>
"#;
