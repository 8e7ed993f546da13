//! Corpus ordering and "see also" selection.

use crate::models::Post;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// Sort posts newest first. The sort is stable and undated posts go last.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by_key(|post| Reverse(post.date));
}

/// Pick up to `max` posts related to `posts[current]`, as indices into `posts`.
///
/// Candidates come from three tiers, in order: the post's explicit `related`
/// ids, posts sharing at least one tag (most shared tags first, then newest),
/// and finally the rest of the corpus in its existing order.
pub fn select_related(posts: &[Post], current: usize, max: usize) -> Vec<usize> {
    let Some(post) = posts.get(current) else {
        return Vec::new();
    };

    let by_id: HashMap<&str, usize> = posts
        .iter()
        .enumerate()
        .map(|(idx, p)| (p.id.as_str(), idx))
        .collect();

    let mut selected: Vec<usize> = Vec::new();
    let mut taken: HashSet<usize> = HashSet::new();
    taken.insert(current);

    for id in &post.related_ids {
        if let Some(&idx) = by_id.get(id.as_str()) {
            if taken.insert(idx) {
                selected.push(idx);
            }
        }
    }

    let tags: HashSet<&str> = post.tags.iter().map(String::as_str).collect();
    let mut scored: Vec<(usize, usize)> = posts
        .iter()
        .enumerate()
        .filter(|(idx, _)| !taken.contains(idx))
        .map(|(idx, other)| {
            let overlap = other.tags.iter().filter(|t| tags.contains(t.as_str())).count();
            (idx, overlap)
        })
        .filter(|&(_, overlap)| overlap > 0)
        .collect();
    scored.sort_by_key(|&(idx, overlap)| (Reverse(overlap), Reverse(posts[idx].date)));

    for (idx, _) in scored {
        if selected.len() >= max {
            break;
        }
        if taken.insert(idx) {
            selected.push(idx);
        }
    }

    for idx in 0..posts.len() {
        if selected.len() >= max {
            break;
        }
        if taken.insert(idx) {
            selected.push(idx);
        }
    }

    selected.truncate(max);
    selected
}

/// Fill in `related` for every post in an already sorted corpus
pub fn resolve_related(posts: &mut [Post], max: usize) {
    let picks: Vec<Vec<usize>> = (0..posts.len())
        .map(|idx| select_related(posts, idx, max))
        .collect();
    for (post, related) in posts.iter_mut().zip(picks) {
        post.related = related;
    }
}
