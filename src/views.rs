// src/views.rs

//! Server-rendered pages.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::models::{
    options::{COUNTRIES, SIDES},
    question::{Claims, Question, Reply},
};

const DEFAULT_OPTION: &str = "Select an option";

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href="/style.css";
            }
            body {
                main { (body) }
            }
        }
    }
}

fn truth_label(fake: bool) -> &'static str {
    if fake { "Fake" } else { "Real" }
}

/// Quiz page listing the selected statements in presentation order.
pub fn quiz_page(seed: &str, questions: &[Question]) -> Markup {
    layout(
        "Real or fake?",
        html! {
            h1 { "Real or fake?" }
            @if questions.is_empty() {
                p { "There are no statements to judge right now. Please come back later." }
            } @else {
                p { "Decide for each statement whether it is real or fabricated." }
                form #quiz method="post" action="/" data-count=(questions.len()) {
                    input type="hidden" name="seed" value=(seed);
                    input #real type="hidden" name="real" value="";
                    input #fake type="hidden" name="fake" value="";

                    @for (i, question) in questions.iter().enumerate() {
                        fieldset.statement data-id=(question.id) {
                            legend { "Statement " (i + 1) " of " (questions.len()) }
                            p.claims { (question.claims.label()) " says:" }
                            blockquote { (PreEscaped(&question.question)) }
                            label {
                                input type="radio" name=(format!("verdict-{}", question.id)) value="real" required;
                                " Real"
                            }
                            label {
                                input type="radio" name=(format!("verdict-{}", question.id)) value="fake";
                                " Fake"
                            }
                        }
                    }

                    fieldset {
                        legend { "About you" }
                        label for="country" { "Country" }
                        select #country name="country" required {
                            option value="" disabled selected { (DEFAULT_OPTION) }
                            @for country in COUNTRIES {
                                option value=(country) { (country) }
                            }
                        }
                        label for="side" { "Side" }
                        select #side name="side" required {
                            option value="" disabled selected { (DEFAULT_OPTION) }
                            @for side in SIDES {
                                option value=(side) { (side) }
                            }
                        }
                        label for="age" { "Age" }
                        input #age type="number" name="age" min="18" max="120" required;
                    }

                    button type="submit" { "See my results" }
                }
                script src="/quiz.js" {}
            }
        },
    )
}

/// Results page for a scored submission.
pub fn results_page(seed: &str, correct: usize, replies: &[Reply]) -> Markup {
    layout(
        "Your results",
        html! {
            h1 { "Your results" }
            p.score { "You judged " strong { (correct) } " of " strong { (replies.len()) } " statements correctly." }
            table {
                thead { tr {
                    th { "Claimed by" }
                    th { "Statement" }
                    th { "Truth" }
                    th { "Your answer" }
                    th { "" }
                } }
                tbody {
                    @for reply in replies {
                        tr class=(if reply.is_correct() { "correct" } else { "wrong" }) {
                            td { (reply.claims.label()) }
                            td { (PreEscaped(&reply.question)) }
                            td { (truth_label(reply.fake)) }
                            td { (truth_label(reply.answered_fake)) }
                            td { @if reply.is_correct() { "✓" } @else { "✗" } }
                        }
                    }
                }
            }
            p.seed { "Quiz " code { (seed) } }
            a href="/" { "Take another quiz" }
        },
    )
}

/// Admin overview of the whole bank, with upload and download controls.
///
/// `answers_page_size` tells the download script when the export has run out of pages.
pub fn admin_page(questions: &[Question], answers_page_size: i64) -> Markup {
    layout(
        "Question bank",
        html! {
            h1 { "Question bank" }
            div #error .toast .hidden role="alert" { p {} }
            section {
                h2 { "Upload" }
                p {
                    "Rows: " code { "ID,claims,real|fake,question" } ". Claims is "
                    code { (Claims::GROUP1_TOKEN) } " or " code { (Claims::GROUP2_TOKEN) }
                    ". The upload replaces the whole bank."
                }
                form #upload method="post" action="/admin/questions" enctype="multipart/form-data" {
                    input type="file" name="file" accept=".csv,text/csv,text/plain" required;
                    button type="submit" { "Replace questions" }
                }
            }
            section {
                h2 { "Downloads" }
                p {
                    a href="/admin/questions" download="questions.csv" { "Download questions" }
                }
                p {
                    button #downloadAnswers type="button" data-page-size=(answers_page_size) {
                        "Download all answers"
                    }
                }
            }
            section {
                h2 { (questions.len()) " questions" }
                table {
                    thead { tr {
                        th { "ID" }
                        th { "Claims" }
                        th { "Fake" }
                        th { "Question" }
                    } }
                    tbody {
                        @for question in questions {
                            tr {
                                td { (question.id) }
                                td { (question.claims.as_token()) }
                                td { @if question.fake { "fake" } @else { "real" } }
                                td { (PreEscaped(&question.question)) }
                            }
                        }
                    }
                }
            }
            script src="/admin.js" {}
        },
    )
}

pub fn error_page(message: &str) -> Markup {
    layout(
        "Something went wrong",
        html! {
            h1 { "Something went wrong" }
            @if !message.is_empty() {
                p.error { (message) }
            }
            p { "Please reload or try again later." }
            a href="/" { "Back to the quiz" }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, text: &str) -> Question {
        Question {
            id,
            question: text.to_string(),
            claims: Claims::Group2,
            fake: false,
        }
    }

    #[test]
    fn quiz_page_carries_seed_and_ids() {
        let page = quiz_page("1234", &[question(7, "Seven"), question(2, "Two")]).into_string();
        assert!(page.contains(r#"name="seed" value="1234""#));
        assert!(page.contains(r#"data-id="7""#));
        assert!(page.contains(r#"data-count="2""#));
        assert!(page.find("Seven").unwrap() < page.find("Two").unwrap());
    }

    #[test]
    fn empty_quiz_has_no_form() {
        let page = quiz_page("1", &[]).into_string();
        assert!(!page.contains("<form"));
    }

    #[test]
    fn seed_is_escaped() {
        let page = results_page("<i>x</i>", 0, &[]).into_string();
        assert!(page.contains("&lt;i&gt;x&lt;/i&gt;"));
    }

    #[test]
    fn admin_page_wires_downloads() {
        let page = admin_page(&[question(3, "Three")], 4000).into_string();
        assert!(page.contains(r#"href="/admin/questions""#));
        assert!(page.contains(r#"data-page-size="4000""#));
        assert!(page.contains(r#"src="/admin.js""#));
        assert!(page.contains("1 questions"));
    }

    #[test]
    fn results_show_score() {
        let replies = vec![Reply {
            question: "Sky is green".into(),
            claims: Claims::Group1,
            fake: true,
            answered_fake: true,
        }];
        let page = results_page("9", 1, &replies).into_string();
        assert!(page.contains("<strong>1</strong> of <strong>1</strong>"));
        assert!(page.contains("Sky is green"));
    }
}
