// src/quiz/scoring.rs

use std::collections::{BTreeSet, HashMap};

use crate::models::question::{Question, Reply};

/// Outcome of scoring one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scorecard {
    pub replies: Vec<Reply>,
    /// Replies whose verdict matches the ground truth.
    pub correct: usize,
}

/// Scores a respondent's real/fake lists against the stored questions.
///
/// One reply is produced per distinct listed id that exists in `questions`, ordered by id.
/// Repeats within one list collapse to a single reply. The verdict is always "fake list
/// contains the id", so an id present in both lists yields two identical replies and
/// counts twice. Ids in neither list are not scored.
pub fn score(questions: &[Question], real_ids: &[i64], fake_ids: &[i64]) -> Scorecard {
    let by_id: HashMap<i64, &Question> = questions.iter().map(|q| (q.id, q)).collect();

    let real: BTreeSet<i64> = real_ids.iter().copied().collect();
    let fake: BTreeSet<i64> = fake_ids.iter().copied().collect();

    let mut requested: Vec<i64> = real.iter().chain(&fake).copied().collect();
    requested.sort();

    let replies: Vec<Reply> = requested
        .into_iter()
        .filter_map(|id| by_id.get(&id).map(|q| (id, *q)))
        .map(|(id, q)| Reply {
            question: q.question.clone(),
            claims: q.claims,
            fake: q.fake,
            answered_fake: fake.contains(&id),
        })
        .collect();

    let correct = replies.iter().filter(|r| r.is_correct()).count();

    Scorecard { replies, correct }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Claims;

    fn question(id: i64, fake: bool) -> Question {
        Question {
            id,
            question: format!("Statement {}", id),
            claims: Claims::Group1,
            fake,
        }
    }

    #[test]
    fn fake_marked_fake_is_correct() {
        let card = score(&[question(1, true)], &[], &[1]);
        assert_eq!(card.correct, 1);
        assert_eq!(card.replies.len(), 1);
        assert!(card.replies[0].answered_fake);
    }

    #[test]
    fn id_in_both_lists_counts_twice() {
        // Known quirk: both replies take their verdict from the fake list.
        let card = score(&[question(1, true)], &[1], &[1]);
        assert_eq!(card.replies.len(), 2);
        assert_eq!(card.correct, 2);
        assert!(card.replies.iter().all(|r| r.answered_fake));
    }

    #[test]
    fn repeats_within_one_list_count_once() {
        let card = score(&[question(1, true)], &[], &[1, 1, 1, 1, 1]);
        assert_eq!(card.replies.len(), 1);
        assert_eq!(card.correct, 1);

        let card = score(&[question(1, true)], &[1, 1], &[1, 1, 1]);
        assert_eq!(card.replies.len(), 2);
        assert_eq!(card.correct, 2);
    }

    #[test]
    fn mixed_answers() {
        let bank = [question(0, false), question(1, true), question(2, false), question(3, true)];
        // 0 real (right), 1 real (wrong), 2 fake (wrong), 3 fake (right)
        let card = score(&bank, &[1, 0], &[3, 2]);
        assert_eq!(card.correct, 2);
        assert_eq!(
            card.replies.iter().map(|r| r.question.as_str()).collect::<Vec<_>>(),
            vec!["Statement 0", "Statement 1", "Statement 2", "Statement 3"]
        );
    }

    #[test]
    fn unlisted_and_unknown_ids_are_ignored() {
        let bank = [question(0, false), question(1, true)];
        let card = score(&bank, &[0, 9], &[]);
        assert_eq!(card.replies.len(), 1);
        assert_eq!(card.correct, 1);
    }

    #[test]
    fn nothing_answered() {
        let card = score(&[question(0, false)], &[], &[]);
        assert!(card.replies.is_empty());
        assert_eq!(card.correct, 0);
    }
}
