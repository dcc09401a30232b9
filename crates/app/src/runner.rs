//! Interactive terminal quiz.

use color_eyre::eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

use quiz_core::model::{GenerationOverrides, Question, QuestionType, SubmittedAnswer};
use services::{QuizSession, QuizSessionService, SessionStatus};

/// One line of user input, interpreted against the question on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Answer(SubmittedAnswer),
    Skip,
    Regenerate,
    Quit,
}

/// Parse a line typed while a question is shown.
///
/// Options can be picked by number or by text; `mcq_multi` takes a comma or
/// space separated list. Returns `None` if the line cannot be used as-is.
pub fn parse_input(question: &Question, line: &str) -> Option<Input> {
    let trimmed = line.trim();
    match trimmed {
        ":s" | ":skip" => return Some(Input::Skip),
        ":r" | ":regen" | ":regenerate" => return Some(Input::Regenerate),
        ":q" | ":quit" => return Some(Input::Quit),
        "" => return None,
        _ => {}
    }

    if question.kind.is_free_text() {
        return Some(Input::Answer(SubmittedAnswer::single(trimmed)));
    }

    if question.kind.expects_multiple() {
        let picks = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| resolve_option(question, token))
            .collect::<Option<Vec<String>>>()?;
        return Some(Input::Answer(SubmittedAnswer::multiple(picks)));
    }

    resolve_option(question, trimmed).map(|pick| Input::Answer(SubmittedAnswer::single(pick)))
}

fn resolve_option(question: &Question, token: &str) -> Option<String> {
    if let Ok(n) = token.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| question.options.get(i))
            .cloned();
    }
    if let Some(option) = question
        .options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(token))
    {
        return Some(option.clone());
    }
    if question.kind == QuestionType::TrueFalse {
        return match token.to_ascii_lowercase().as_str() {
            "t" | "true" => Some("True".to_string()),
            "f" | "false" => Some("False".to_string()),
            _ => None,
        };
    }
    question.options.is_empty().then(|| token.to_string())
}

type StdinLines = Lines<BufReader<Stdin>>;

/// Drive `session` from stdin until the user quits.
pub async fn run(session: &mut QuizSession, workflow: &QuizSessionService) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match session.status() {
            SessionStatus::Empty => {
                println!("No quiz found. Run `quiz generate` first.");
                return Ok(());
            }
            SessionStatus::Finished => {
                print_results(session)?;
                println!();
                println!("[r]etry, re[g]enerate, or [q]uit?");
                let Some(line) = lines.next_line().await? else {
                    return Ok(());
                };
                match line.trim() {
                    "r" | "retry" => session.restart(),
                    "g" | "regenerate" => regenerate(session, workflow).await,
                    _ => return Ok(()),
                }
            }
            SessionStatus::AwaitingAcknowledgement => {
                session.advance();
            }
            SessionStatus::InProgress => {
                if !ask_current(session, workflow, &mut lines).await? {
                    return Ok(());
                }
            }
        }
    }
}

// Returns false when the user asked to quit or stdin closed.
async fn ask_current(
    session: &mut QuizSession,
    workflow: &QuizSessionService,
    lines: &mut StdinLines,
) -> Result<bool> {
    let Some(question) = session.current_question().cloned() else {
        return Ok(true);
    };
    print_question(session, &question);

    let Some(line) = lines.next_line().await? else {
        return Ok(false);
    };
    let Some(input) = parse_input(&question, &line) else {
        println!("Could not read that answer; try again.");
        return Ok(true);
    };

    match input {
        Input::Quit => return Ok(false),
        Input::Skip => {
            session.skip()?;
        }
        Input::Regenerate => regenerate(session, workflow).await,
        Input::Answer(answer) => match session.submit_answer(&question.id, answer) {
            Ok(feedback) => {
                if feedback.correct {
                    println!("Correct!");
                } else {
                    println!("Incorrect.");
                }
                if let Some(explanation) = &question.explanation {
                    println!("  {explanation}");
                }
                println!("(press Enter to continue)");
                if lines.next_line().await?.is_none() {
                    return Ok(false);
                }
                session.advance();
            }
            Err(err) => println!("{err}"),
        },
    }
    Ok(true)
}

async fn regenerate(session: &mut QuizSession, workflow: &QuizSessionService) {
    println!("Generating a new quiz...");
    match workflow
        .regenerate(session, GenerationOverrides::default())
        .await
    {
        Ok(()) => println!("New quiz: {} ({} questions)", session.title(), session.quiz().len()),
        Err(err) => {
            warn!(error = %err, "regeneration failed");
            println!("Could not generate a new quiz: {err}");
        }
    }
}

fn print_question(session: &QuizSession, question: &Question) {
    let progress = session.progress();
    println!();
    println!(
        "{} · Question {} of {} ({} answered)",
        session.title(),
        progress.position,
        progress.total,
        progress.answered
    );
    println!("{}", question.question);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    let hint = match question.kind {
        QuestionType::McqMulti => "pick one or more numbers, e.g. 1,3",
        QuestionType::AnswerShortQuestion => "type your answer",
        QuestionType::McqSingle | QuestionType::TrueFalse => "pick a number",
    };
    println!("[{hint}; :skip, :regen, :quit]");
}

fn print_results(session: &QuizSession) -> Result<()> {
    let summary = session.compute_summary()?;
    println!();
    println!("Quiz complete: {}", session.title());
    println!(
        "Total {} · Correct {} · Incorrect {} · Accuracy {:.1}%",
        summary.total(),
        summary.correct(),
        summary.incorrect(),
        summary.accuracy_percent()
    );
    for item in session.review() {
        let mark = if item.correct { "✓" } else { "✗" };
        let answer = item
            .user_answer
            .as_ref()
            .map_or_else(|| "(no answer)".to_string(), ToString::to_string);
        println!("{mark} {}. {}", item.number, item.question);
        println!("    your answer: {answer}");
        if !item.correct {
            println!("    correct: {}", item.correct_answers.join(", "));
        }
        if let Some(explanation) = &item.explanation {
            println!("    {explanation}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multi() -> Question {
        Question::new("m", QuestionType::McqMulti, "Pick")
            .with_options(["Alpha", "Beta", "Gamma"])
            .with_correct_answers(["Alpha", "Gamma"])
    }

    #[test]
    fn commands_are_recognised() {
        let q = multi();
        assert_eq!(parse_input(&q, " :skip "), Some(Input::Skip));
        assert_eq!(parse_input(&q, ":q"), Some(Input::Quit));
        assert_eq!(parse_input(&q, ":regen"), Some(Input::Regenerate));
        assert_eq!(parse_input(&q, "   "), None);
    }

    #[test]
    fn multi_select_by_number_or_text() {
        let q = multi();
        assert_eq!(
            parse_input(&q, "1, 3"),
            Some(Input::Answer(SubmittedAnswer::multiple(["Alpha", "Gamma"])))
        );
        assert_eq!(
            parse_input(&q, "beta"),
            Some(Input::Answer(SubmittedAnswer::multiple(["Beta"])))
        );
        assert_eq!(parse_input(&q, "1,9"), None);
    }

    #[test]
    fn true_false_accepts_shorthand() {
        let q = Question::new("t", QuestionType::TrueFalse, "?");
        assert_eq!(
            parse_input(&q, "t"),
            Some(Input::Answer(SubmittedAnswer::single("True")))
        );
        assert_eq!(parse_input(&q, "maybe"), None);
    }

    #[test]
    fn short_answer_is_taken_verbatim() {
        let q = Question::new("s", QuestionType::AnswerShortQuestion, "Capital?");
        assert_eq!(
            parse_input(&q, "  New York "),
            Some(Input::Answer(SubmittedAnswer::single("New York")))
        );
    }
}
