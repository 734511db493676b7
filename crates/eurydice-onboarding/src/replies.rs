//! Canned phrases used for mention and direct-message replies.

use rand::Rng;

pub const REPLY_BODIES: [&str; 18] = [
    "exactly",
    "fascinating",
    "good point",
    "hi",
    "hmmm",
    "i agree",
    "i believe in you",
    "lmao",
    "okay",
    "ooh",
    "rawr",
    "so true",
    "sure sure",
    "wonderful",
    "_considers what you've said_",
    "_prances around_",
    "hey is that a snake",
    "i'm a simple chatbot incapable of thought or emotion",
];

pub const REPLY_SUFFIXES: [&str; 19] = [
    "!",
    "!!",
    "..",
    " :3",
    " :D",
    " :0",
    " :P",
    " :>",
    " :tw_sparkles:",
    " :tw_sparkling_heart:",
    " :tw_relieved:",
    " :tw_sunglasses:",
    " :orpheus:",
    " :orpheus-pop:",
    " :aww:",
    " :blob_hype:",
    " :hyperbongocat:",
    " :thincc:",
    " :ultrafastparrot:",
];

/// Picks one body and one suffix independently and uniformly, joined with no separator.
pub fn random_response<R>(rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let body = REPLY_BODIES[rng.gen_range(0..REPLY_BODIES.len())];
    let suffix = REPLY_SUFFIXES[rng.gen_range(0..REPLY_SUFFIXES.len())];
    format!("{body}{suffix}")
}

/// Enumerates every reply `random_response` can produce.
pub fn all_responses() -> impl Iterator<Item = String> {
    REPLY_BODIES.iter().flat_map(|body| {
        REPLY_SUFFIXES
            .iter()
            .map(move |suffix| format!("{body}{suffix}"))
    })
}
