use super::config::SearchConfig;
use super::state::{Move, NONTERMINAL_PENALTY, SearchState};
use rand::Rng;
use rand::seq::SliceRandom;
use std::time::Instant;

#[derive(Debug, Clone)]
struct Node {
    state: SearchState,
    mv: Option<Move>,
    parent: Option<usize>,
    children: Vec<usize>,
    untried: Vec<Move>,
    visits: u32,
    total_reward: f64,
}

impl Node {
    fn new(state: SearchState, mv: Option<Move>, parent: Option<usize>) -> Self {
        let untried = state.possible_moves();
        Self {
            state,
            mv,
            parent,
            children: Vec::new(),
            untried,
            visits: 0,
            total_reward: 0.0,
        }
    }

    fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / f64::from(self.visits)
        }
    }
}

/// Counters from one planning call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchStats {
    pub iterations: u32,
    pub nodes: usize,
    pub elapsed_ms: u64,
    /// Visits of the first move on the chosen line.
    pub best_visits: u32,
    pub best_mean: f64,
}

/// Result of a planning call: the chosen line and the state it leads to.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub sequence: Vec<Move>,
    pub final_state: SearchState,
    pub stats: SearchStats,
}

/// Search tree stored as an arena; nodes refer to each other by index.
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<Node>,
    exploration: f64,
}

impl SearchTree {
    pub fn new(root: SearchState, exploration: f64) -> Self {
        Self {
            nodes: vec![Node::new(root, None, None)],
            exploration,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root_visits(&self) -> u32 {
        self.nodes[0].visits
    }

    /// Runs one select, expand, rollout, backpropagate cycle.
    pub fn iterate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let selected = self.select();
        let leaf = self.expand(selected, rng);
        let reward = rollout(&self.nodes[leaf].state, rng);
        self.backpropagate(leaf, reward);
    }

    fn select(&self) -> usize {
        let mut index = 0;
        loop {
            let node = &self.nodes[index];
            if !node.untried.is_empty() || node.state.is_terminal() || node.children.is_empty() {
                return index;
            }
            let mut best = node.children[0];
            let mut best_score = f64::NEG_INFINITY;
            for &child in &node.children {
                let score = self.ucb(index, child);
                if score > best_score {
                    best_score = score;
                    best = child;
                }
            }
            index = best;
        }
    }

    fn ucb(&self, parent: usize, child: usize) -> f64 {
        let child = &self.nodes[child];
        if child.visits == 0 {
            return f64::INFINITY;
        }
        let parent_visits = f64::from(self.nodes[parent].visits.max(1));
        let child_visits = f64::from(child.visits);
        child.mean() + self.exploration * (2.0 * parent_visits.ln() / child_visits).sqrt()
    }

    fn expand<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) -> usize {
        if self.nodes[index].untried.is_empty() {
            return index;
        }
        let pick = rng.gen_range(0..self.nodes[index].untried.len());
        let mv = self.nodes[index].untried.remove(pick);
        let state = self.nodes[index].state.apply(&mv);
        let child = self.nodes.len();
        self.nodes.push(Node::new(state, Some(mv), Some(index)));
        self.nodes[index].children.push(child);
        child
    }

    fn backpropagate(&mut self, mut index: usize, reward: f64) {
        loop {
            let node = &mut self.nodes[index];
            node.visits += 1;
            node.total_reward += reward;
            match node.parent {
                Some(parent) => index = parent,
                None => break,
            }
        }
    }

    /// Follows the most visited child from the root; ties keep the earlier child.
    pub fn best_sequence(&self) -> Vec<Move> {
        let mut sequence = Vec::new();
        let mut index = 0;
        while let Some(next) = self.most_visited_child(index) {
            if let Some(mv) = &self.nodes[next].mv {
                sequence.push(mv.clone());
            }
            index = next;
        }
        sequence
    }

    fn most_visited_child(&self, index: usize) -> Option<usize> {
        let mut best: Option<usize> = None;
        for &child in &self.nodes[index].children {
            let better = match best {
                Some(current) => self.nodes[child].visits > self.nodes[current].visits,
                None => true,
            };
            if better {
                best = Some(child);
            }
        }
        best
    }
}

/// Plays uniformly random moves from `state` until the plan finishes, then scores it.
pub fn rollout<R: Rng + ?Sized>(state: &SearchState, rng: &mut R) -> f64 {
    let mut current = state.clone();
    while !current.is_terminal() {
        if current.is_exhausted() {
            current = current.finish_exhausted();
            break;
        }
        let moves = current.possible_moves();
        current = match moves.choose(rng) {
            Some(mv) => current.apply(mv),
            None => match current.remaining().choose(rng).copied() {
                Some(card) => current.apply(&Move::Finish(card)),
                None => current.finish_exhausted(),
            },
        };
    }
    current.evaluate().unwrap_or(NONTERMINAL_PENALTY)
}

/// Searches for the best lay-down of `root`.
///
/// Runs up to `config.iterations` iterations, stopping early once the time
/// budget is spent. The same seed and config always produce the same line.
pub fn plan<R: Rng + ?Sized>(
    root: &SearchState,
    config: &SearchConfig,
    rng: &mut R,
) -> SearchOutcome {
    let started = Instant::now();
    let mut tree = SearchTree::new(root.clone(), config.exploration);
    let mut iterations = 0u32;
    while iterations < config.iterations {
        if config.out_of_time(iterations, started.elapsed().as_millis() as u64) {
            break;
        }
        tree.iterate(rng);
        iterations += 1;
    }

    let sequence = tree.best_sequence();
    let final_state = root.apply_sequence(&sequence);
    let (best_visits, best_mean) = tree
        .most_visited_child(0)
        .map(|child| (tree.nodes[child].visits, tree.nodes[child].mean()))
        .unwrap_or((0, 0.0));

    SearchOutcome {
        sequence,
        final_state,
        stats: SearchStats {
            iterations,
            nodes: tree.node_count(),
            elapsed_ms: started.elapsed().as_millis() as u64,
            best_visits,
            best_mean,
        },
    }
}
