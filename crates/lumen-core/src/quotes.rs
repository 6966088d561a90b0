//! Literary quotes
//!
//! Selection is uniform and independent; the same quote may come up twice
//! in a row.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// A quote and its author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub const LITERARY_QUOTES: [Quote; 15] = [
    Quote {
        text: "A reader lives a thousand lives before he dies. The man who never reads lives only one.",
        author: "George R.R. Martin",
    },
    Quote {
        text: "The person, be it gentleman or lady, who has not pleasure in a good novel, must be intolerably stupid.",
        author: "Jane Austen",
    },
    Quote {
        text: "I have always imagined that paradise will be a kind of library.",
        author: "Jorge Luis Borges",
    },
    Quote {
        text: "Reading is to the mind what exercise is to the body.",
        author: "Joseph Addison",
    },
    Quote {
        text: "Books are a uniquely portable magic.",
        author: "Stephen King",
    },
    Quote {
        text: "A book is a dream you hold in your hands.",
        author: "Neil Gaiman",
    },
    Quote {
        text: "Reading is escape, and the opposite of escape; it's a way to make contact with reality after a day of making things up.",
        author: "Nora Ephron",
    },
    Quote {
        text: "The reading of all good books is like conversation with the finest minds of past centuries.",
        author: "René Descartes",
    },
    Quote {
        text: "Once you learn to read, you will be forever free.",
        author: "Frederick Douglass",
    },
    Quote {
        text: "Words have no single fixed meaning; their meaning is altered by use.",
        author: "Paul Auster",
    },
    Quote {
        text: "Reading gives us someplace to go when we have to stay where we are.",
        author: "Mason Cooley",
    },
    Quote {
        text: "A great book should leave you with many experiences, and slightly exhausted at the end.",
        author: "William Styron",
    },
    Quote {
        text: "Literature is the most agreeable way of ignoring life.",
        author: "Fernando Pessoa",
    },
    Quote {
        text: "There is no greater agony than bearing an untold story inside you.",
        author: "Maya Angelou",
    },
    Quote {
        text: "Reading is a conversation. All books talk. But a good book listens as well.",
        author: "Mark Haddon",
    },
];

/// Pick one entry uniformly at random, `None` for an empty pool
pub fn pick_random<'a, T, R>(pool: &'a [T], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    pool.choose(rng)
}

/// A random quote from the built-in pool
pub fn random_quote() -> &'static Quote {
    let mut rng = rand::thread_rng();
    let index = rng.gen_range(0..LITERARY_QUOTES.len());
    &LITERARY_QUOTES[index]
}
