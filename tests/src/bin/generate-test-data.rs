use chrono::{Duration, TimeZone, Utc};
use forum_api::{Comment, CommentId, PostId, Status, UserId};
use rand::{seq::SliceRandom, Rng};

const NUM_USERS: i64 = 5;

const NUM_COMMENTS: i64 = 60;
const COMMENT_WORD_COUNT: usize = 12;

// Out of 100
const TOP_LEVEL_CHANCE: u32 = 30;
const ORPHAN_CHANCE: u32 = 5;
const REMOVED_CHANCE: u32 = 20;

const POST: PostId = PostId(1);

fn gen_comment_text() -> String {
    lipsum::lipsum_words(COMMENT_WORD_COUNT)
}

fn gen_chance(rng: &mut impl Rng, percent: u32) -> bool {
    rng.gen_range(0..100) < percent
}

fn main() {
    let mut rng = rand::thread_rng();
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    let mut comments = Vec::new();
    let mut date = start;
    for id in 1..=NUM_COMMENTS {
        date = date + Duration::seconds(rng.gen_range(1..3600));
        let parent = if id == 1 || gen_chance(&mut rng, TOP_LEVEL_CHANCE) {
            None
        } else if gen_chance(&mut rng, ORPHAN_CHANCE) {
            // reply to a comment that is not part of the dump
            Some(CommentId(NUM_COMMENTS + rng.gen_range(1..1000)))
        } else {
            Some(CommentId(rng.gen_range(1..id)))
        };
        let author = rng.gen_range(1..=NUM_USERS);
        comments.push(Comment {
            id: CommentId(id),
            post_id: Some(POST),
            parent_id: parent,
            body: gen_comment_text(),
            author_id: UserId(author),
            author_name: Some(format!("user{author}")),
            created_at: date,
            status: match gen_chance(&mut rng, REMOVED_CHANCE) {
                true => Status::Removed,
                false => Status::Active,
            },
        });
    }

    // the backend sorts, but threading must not rely on it
    comments.shuffle(&mut rng);

    println!(
        "{}",
        serde_json::to_string_pretty(&comments).expect("serializing comments")
    );
}
