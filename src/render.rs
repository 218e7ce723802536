//! LaTeX document emission.
//!
//! Stage 3 of the catset pipeline. Takes the renumbered questions and
//! assembles the complete `.tex` document: preamble, title page and table
//! of contents, one block per question, and the closing matter.
//!
//! ## Question block layout
//!
//! ```text
//! \hypertarget{q1}{\section{Q. 1: What is thy only comfort?}}
//!
//! A: That both in Soul and$^{1}$ Body, whether I live or die$^{2}$
//!
//! \begin{mdframed}[...]           % footnote box, two columns
//! $^{1}$ \href{...}{1 Corinthians 6:19; 1 Thessalonians 5:10}\\
//! $^{2}$ \href{...}{Romans 14:8}\\
//! \end{mdframed}
//! ```
//!
//! The answer joins section texts with single spaces; each marked section's
//! superscript sits directly after its text, before the next fragment.
//! Three answer shapes exist (see [`crate::listing`]): flowing prose,
//! enumerated lists, and hierarchical numbered prose.
//!
//! ## Failure and output discipline
//!
//! Emission validates every question (non-empty prompt, at least one
//! section) before any text is assembled, and the document is built fully
//! in memory before a single byte is written. A failed run therefore never
//! leaves a partial output file behind.

use crate::config::DocConfig;
use crate::listing;
use crate::number::{Footnote, NumberedQuestion};
use crate::schedule::Week;
use crate::tex;
use crate::types::Question;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Question {id} has no answer sections")]
    NoSections { id: String },
    #[error("Question {id} has an empty prompt")]
    EmptyPrompt { id: String },
}

/// Check the emission preconditions for a set of questions.
///
/// Also used by `catset check` so data problems surface without building.
pub fn validate(questions: &[Question]) -> Result<(), RenderError> {
    questions.iter().try_for_each(validate_question)
}

fn validate_question(q: &Question) -> Result<(), RenderError> {
    if q.question.trim().is_empty() {
        return Err(RenderError::EmptyPrompt { id: q.id.clone() });
    }
    if q.sections.is_empty() {
        return Err(RenderError::NoSections { id: q.id.clone() });
    }
    Ok(())
}

/// Assemble the complete LaTeX document as a string.
///
/// `weeks` maps a question id to the week it opens; matching questions get
/// a page break and week heading before their block.
pub fn build_document(
    questions: &[NumberedQuestion],
    config: &DocConfig,
    weeks: Option<&BTreeMap<u32, &Week>>,
) -> Result<String, RenderError> {
    for nq in questions {
        validate_question(&nq.question)?;
    }

    let mut doc = String::new();
    doc.push_str(&preamble(config));
    doc.push_str(&document_start(&config.title));

    for nq in questions {
        if let Some(weeks) = weeks
            && let Ok(n) = nq.question.id.parse::<u32>()
            && let Some(week) = weeks.get(&n)
        {
            doc.push_str(&week_heading(week));
        }
        doc.push_str(&question_block(nq, config));
    }

    doc.push_str("\\end{document}\n");
    Ok(doc)
}

/// Write the assembled document to the output sink in one pass.
pub fn write_document(output: &Path, doc: &str) -> Result<(), RenderError> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, doc)?;
    Ok(())
}

// ============================================================================
// Document frame
// ============================================================================

fn preamble(config: &DocConfig) -> String {
    let title = tex::escape(&config.title);
    let fonts = &config.fonts.dir;
    format!(
        "\\documentclass[12pt,article]{{article}}\n\
         \\usepackage{{geometry}}\n\
         \\geometry{{margin=1in}}\n\
         \\usepackage{{titlesec}}\n\
         \\usepackage{{xcolor}}\n\
         \\usepackage{{fancyhdr}}\n\
         \\usepackage{{fontspec}}\n\
         \\setmainfont[Path={fonts},UprightFont=EBGaramond12-Regular.otf,ItalicFont=EBGaramond12-Italic.otf]{{EB Garamond}}\n\
         \\usepackage{{setspace}}\n\
         \\onehalfspacing\n\
         \\usepackage{{mdframed}}\n\
         \\usepackage{{multicol}}\n\
         \\usepackage{{enumitem}}\n\
         \\usepackage{{bookmark}}\n\
         \\usepackage{{tocloft}}\n\
         \\setlength{{\\cftbeforesecskip}}{{10pt}}\n\
         \\renewcommand{{\\cftsecfont}}{{\\bfseries}}\n\
         \\usepackage{{hyperref}}\n\
         \\hypersetup{{\n\
         \x20\x20colorlinks=true,\n\
         \x20\x20linkcolor=blue,\n\
         \x20\x20urlcolor=blue,\n\
         \x20\x20citecolor=blue,\n\
         \x20\x20linktoc=all,\n\
         \x20\x20bookmarksnumbered=true,\n\
         \x20\x20bookmarksopen=true\n\
         }}\n\
         \\setcounter{{secnumdepth}}{{0}}\n\
         \\titleformat{{\\section}}{{\\LARGE\\bfseries\\color[RGB]{{231, 76, 60}}}}{{\\thesection}}{{1em}}{{}}\n\
         \\titleformat{{\\subsection}}{{\\Large\\bfseries\\color{{black}}}}{{\\thesubsection}}{{1em}}{{}}\n\
         \\pagestyle{{fancy}}\n\
         \\fancyhead[R]{{{title}}}\n\
         \\fancyhead[L]{{\\thepage}}\n\
         \\fancyfoot{{}}\n"
    )
}

fn document_start(title: &str) -> String {
    let title = tex::escape(title);
    format!(
        "\\begin{{document}}\n\n\
         \\title{{{title}}}\n\
         \\maketitle\n\
         \\tableofcontents\n\
         \\newpage\n\n"
    )
}

fn week_heading(week: &Week) -> String {
    let title = tex::escape(&week.title);
    format!(
        "\\newpage\n\\subsection{{Week {}: {}}}\n\\vspace{{10pt}}\n\n",
        week.week, title
    )
}

// ============================================================================
// Question blocks
// ============================================================================

fn question_block(nq: &NumberedQuestion, config: &DocConfig) -> String {
    let heading = question_heading(&nq.question);
    let answer = render_answer(nq);
    let footnotes = render_footnotes(&nq.footnotes, config);

    if footnotes.is_empty() {
        format!("{heading}\n\n{answer}\n\n\\vspace{{10pt}}\\hrulefill\n\n")
    } else {
        format!("{heading}\n\n{answer}\n\n{footnotes}\n\n\\vspace{{10pt}}\\hrulefill\n\n")
    }
}

/// Section heading with an explicit hyperref target so schedule and TOC
/// links land on the question itself.
fn question_heading(q: &Question) -> String {
    let anchor = tex::anchor(&q.id);
    let id = tex::escape(&q.id);
    let prompt = tex::escape(&q.question);
    format!("\\hypertarget{{{anchor}}}{{\\section{{Q. {id}: {prompt}}}}}")
}

fn marker(n: u32) -> String {
    format!("$^{{{n}}}$")
}

/// One answer fragment as escaped text plus its marker, if any.
/// Empty for a blank unmarked fragment.
fn fragment_token(text: &str, mark: Option<u32>) -> String {
    let mut token = tex::escape(text);
    if let Some(n) = mark {
        token.push_str(&marker(n));
    }
    token
}

fn render_answer(nq: &NumberedQuestion) -> String {
    let sections = &nq.question.sections;
    if listing::is_hierarchical_answer(sections) {
        hierarchical_answer(nq)
    } else if listing::is_list_answer(sections) {
        list_answer(nq)
    } else {
        regular_answer(nq)
    }
}

/// Flowing prose: fragments joined with single spaces, markers inline.
fn regular_answer(nq: &NumberedQuestion) -> String {
    let mut out = String::from("A: ");
    for (section, mark) in nq.question.sections.iter().zip(&nq.markers) {
        let token = fragment_token(&section.text, *mark);
        if token.is_empty() {
            continue;
        }
        out.push_str(&token);
        out.push(' ');
    }
    out.trim_end().to_string()
}

/// Enumerated answer: non-item fragments form the intro, item fragments
/// become `\item` lines with their inline prefix stripped (the environment
/// numbers them).
fn list_answer(nq: &NumberedQuestion) -> String {
    let mut intro = String::from("A: ");
    let mut items = String::new();

    for (section, mark) in nq.question.sections.iter().zip(&nq.markers) {
        if section.text.is_empty() && mark.is_none() {
            continue;
        }
        if listing::is_item(&section.text) {
            let token = fragment_token(listing::strip_item_prefix(&section.text), *mark);
            items.push_str("\\item ");
            items.push_str(&token);
            items.push('\n');
        } else {
            intro.push_str(&fragment_token(&section.text, *mark));
            intro.push(' ');
        }
    }

    let intro = intro.trim_end();
    if items.is_empty() {
        return intro.to_string();
    }
    format!("{intro}\n\n\\begin{{enumerate}}\n{items}\\end{{enumerate}}")
}

/// Numbered prose: each `N. ` head starts a new paragraph, no enumerate.
fn hierarchical_answer(nq: &NumberedQuestion) -> String {
    let mut out = String::from("A: ");
    for (i, (section, mark)) in nq.question.sections.iter().zip(&nq.markers).enumerate() {
        let token = fragment_token(&section.text, *mark);
        if token.is_empty() {
            continue;
        }
        if i > 0 && listing::is_numbered_head(&section.text) {
            let trimmed = out.trim_end().len();
            out.truncate(trimmed);
            out.push_str("\n\n");
        }
        out.push_str(&token);
        out.push(' ');
    }
    out.trim_end().to_string()
}

// ============================================================================
// Footnotes
// ============================================================================

/// Footnote box: a framed two-column block after the answer, one line per
/// marker, verse references hyperlinked when links are enabled.
fn render_footnotes(footnotes: &[Footnote], config: &DocConfig) -> String {
    if footnotes.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(
        "\\begin{mdframed}[linecolor=blue!20,backgroundcolor=blue!5,linewidth=1pt,\
         skipabove=20pt,skipbelow=20pt,innertopmargin=0pt,innerbottommargin=15pt]\n",
    );
    out.push_str("\\setlength{\\columnsep}{2em}\n");
    out.push_str("\\setlength{\\parindent}{0pt}\n");
    out.push_str("\\begin{multicols}{2}\n");
    out.push_str("\\footnotesize\\color[RGB]{0, 0, 150}\n");

    for footnote in footnotes {
        let verses = tex::escape(&footnote.verses);
        let mark = marker(footnote.number);
        if config.links.enabled {
            let url = tex::passage_url(&footnote.verses, &config.links.version);
            out.push_str(&format!("{mark} \\href{{{url}}}{{{verses}}}\\\\\n"));
        } else {
            out.push_str(&format!("{mark} {verses}\\\\\n"));
        }
    }

    out.push_str("\\end{multicols}\n");
    out.push_str("\\end{mdframed}");
    out
}
