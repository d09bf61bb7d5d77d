// All LLM prompt constants for the generation flows.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for project explanations. Enforces JSON-only output.
pub const EXPLAIN_SYSTEM: &str = "You are a tech expert and portfolio reviewer. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Output contract shared by both explain prompt variants.
pub const EXPLAIN_OUTPUT_SCHEMA: &str = r#"Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "A one-sentence summary of the project's main purpose.",
  "features": ["3-4 key features or actions a user can perform"],
  "techStack": "A concluding sentence that highlights the key technologies used."
}"#;

/// Explain prompt built from the project's own page content.
/// Replace: {title}, {tags}, {page_content}, {output_schema}
pub const EXPLAIN_FROM_PAGE_TEMPLATE: &str = r#"Based on the content of the project's web page below, generate a concise and insightful explanation of "{title}".
The project is tagged with: {tags}.

PAGE CONTENT:
{page_content}

{output_schema}"#;

/// Explain prompt built from the metadata the owner entered.
/// Replace: {title}, {description}, {tags}, {output_schema}
pub const EXPLAIN_FROM_METADATA_TEMPLATE: &str = r#"Based on the following project details, generate a concise and insightful explanation.

You are explaining "{title}".
The project is described as: "{description}".
It uses the following technologies: {tags}.

{output_schema}"#;

/// System prompt for copy refinement. Enforces JSON-only output.
pub const REFINE_SYSTEM: &str = "You are an expert copywriter and portfolio consultant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Refinement prompt template.
/// Replace: {title}, {description}, {tags}
pub const REFINE_PROMPT_TEMPLATE: &str = r#"Improve the provided project details to make them sound more professional, engaging, and impactful for a tech portfolio.

PROJECT DETAILS:
- Current Title: "{title}"
- Current Description: "{description}"
- Current Tags: {tags}

GOALS:
1. Title: Rewrite the title to be more compelling and descriptive. Keep it concise.
2. Description: Rewrite the description to be more professional and clear. Correct grammatical errors, improve the wording, and highlight the project's value. It must start with a capital letter.
3. Tags: Standardize capitalization (e.g. 'next.js' becomes 'Next.js'). Remove duplicates. Keep only tags that represent real technologies.

Do not change the core meaning, just enhance the presentation.

Return a JSON object with this EXACT schema:
{
  "refinedTitle": "...",
  "refinedDescription": "...",
  "refinedTags": ["..."]
}"#;

/// Resume prompt template.
/// Replace: {no_invention_instruction}, {name}, {title}, {email}, {phone}, {location},
///          {github}, {linkedin}, {website}, {summary}, {degree}, {college},
///          {duration}, {cgpa}, {education_notes}, {skills}, {projects},
///          {languages}, {interests}
pub const RESUME_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer. Generate a polished, one-page resume in HTML format for a developer named {name}.
{no_invention_instruction}
Your entire response MUST be the raw HTML content of a single <div> element with the class "resume-container".
Your output should begin directly with <div class="resume-container">.

---
RESUME INFORMATION

Personal details:
- Name: {name}
- Title: {title}
- Email: {email}
- Phone: {phone}
- Location: {location}
- GitHub: {github}
- LinkedIn: {linkedin}
- Portfolio Website: {website}

Professional summary:
{summary}

Education:
- Degree: {degree}
- College: {college}
- Duration: {duration}
- CGPA: {cgpa}
- Notes:
{education_notes}

Skills:
{skills}

Projects:
{projects}

Languages:
{languages}

Interests:
{interests}
---

HTML STRUCTURE TO FILL:
<div class="resume-container">
  <header class="resume-header">
    <h1>name</h1>
    <h2>title</h2>
    <div class="contact-info">
      <p><span>email</span> &bull; <span>phone</span> &bull; <span>location</span></p>
      <p><a href="github">github</a> &bull; <a href="linkedin">LinkedIn</a> &bull; <a href="website">Portfolio</a></p>
    </div>
  </header>
  <section class="resume-section"><h3>PROFESSIONAL SUMMARY</h3><p>summary</p></section>
  <section class="resume-section"><h3>SKILLS</h3><ul class="skills-list"><li>skill</li></ul></section>
  <section class="resume-section"><h3>PROJECTS / EXPERIENCE</h3>
    <div class="item"><h4>project title</h4><p>description (<strong>Tech:</strong> tags) &mdash; <a href="link">View Project</a></p></div>
  </section>
  <section class="resume-section"><h3>EDUCATION</h3>
    <div class="item"><h4>college</h4><p><strong>degree</strong> | duration</p><p><strong>CGPA:</strong> cgpa</p><ul><li>note</li></ul></div>
  </section>
  <section class="resume-section"><h3>LANGUAGES</h3><p class="languages-list"><span><strong>language</strong> (proficiency)</span></p></section>
  <section class="resume-section"><h3>INTERESTS</h3><p>interests</p></section>
</div>"#;

/// Returned in place of a resume when generation fails and the flow is in placeholder mode.
pub const RESUME_FAILED_HTML: &str = "<h2>Error: Resume Generation Failed</h2>\
    <p>The AI was unable to generate the resume content at this time. \
    This could be due to a temporary service issue. Please try again later.</p>";
