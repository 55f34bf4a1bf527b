//! Havannah board environment
//!
//! Produces the input planes the AlphaZero network consumes. The board is a
//! hexagon embedded in a `size × size` grid; cell `(i, j)` (row, column) is
//! playable when `inner - 1 <= i + j <= 2 * size - inner - 1`, with
//! `inner = (size + 1) / 2`:
//!
//! ```text
//!  size = 5         row
//!      . . .         1
//!     . . . .        2
//!    . . . . .       3
//!     . . . .        4
//!      . . .         5
//! ```
//!
//! A player wins by connecting two corners (bridge), three edges (fork) or
//! by closing a loop around at least one cell (ring).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::game::player::Player;
use crate::neural::network_config::NetworkConfig;
use crate::{AlphaZeroNetError, Result};

pub const HAVANNAH_NAME: &str = "havannah";
pub const HAVANNAH_NUM_PLAYER: usize = 2;
pub const MAX_HAVANNAH_BOARD_SIZE: usize = 19;

const NUM_INPUT_CHANNELS: usize = 4;
const CORNER_MASK: u16 = 0x3f;
const MIN_RING_SIZE: usize = 6;

/// Axial neighbour offsets `(d_row, d_col)`
///
/// The diagonal pair is `(-1, +1)` / `(+1, -1)`, not `(-1, -1)` / `(+1, +1)`:
/// the playable region is bounded on `row + col`, so these are the two
/// diagonals that stay adjacent on the hexagon and keep corners on its rim.
const NEIGHBOR_OFFSETS: [(isize, isize); 6] = [(0, -1), (0, 1), (-1, 0), (1, 0), (-1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HavannahConfig {
    /// Width of the embedding grid; odd, at most 19 (base `(size + 1) / 2`)
    pub board_size: usize,
    /// Let the second player take over the first stone instead of answering it
    pub use_swap_rule: bool,
}

impl Default for HavannahConfig {
    fn default() -> Self {
        Self {
            board_size: 9,
            use_swap_rule: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HavannahAction {
    action_id: usize,
    player: Player,
}

impl HavannahAction {
    pub fn new(action_id: usize, player: Player) -> Self {
        Self { action_id, player }
    }

    /// Parse `[colour, coordinate]`, e.g. `["B", "c1"]`
    pub fn from_string_args(args: &[&str], board_size: usize) -> Result<Self> {
        let [colour, coordinate] = args else {
            return Err(AlphaZeroNetError::Game(format!(
                "expected [player, coordinate], got {:?}",
                args
            )));
        };

        let player = colour
            .chars()
            .next()
            .and_then(Player::from_char)
            .filter(|p| *p != Player::None)
            .ok_or_else(|| AlphaZeroNetError::Game(format!("invalid player '{}'", colour)))?;

        let action_id = coordinate_to_action_id(coordinate, board_size)?;
        Ok(Self::new(action_id, player))
    }

    pub fn action_id(&self) -> usize {
        self.action_id
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn next_player(&self) -> Player {
        self.player.next_player(HAVANNAH_NUM_PLAYER)
    }

    pub fn to_coordinate_string(&self, board_size: usize) -> String {
        action_id_to_coordinate(self.action_id, board_size)
    }
}

/// Column letter (skipping `I`) followed by the 1-based row, e.g. `C1`
pub fn action_id_to_coordinate(action_id: usize, board_size: usize) -> String {
    let (row, col) = (action_id / board_size, action_id % board_size);
    format!("{}{}", column_letter(col), row + 1)
}

fn column_letter(col: usize) -> char {
    (b'A' + col as u8 + u8::from(col >= 8)) as char
}

pub fn coordinate_to_action_id(coordinate: &str, board_size: usize) -> Result<usize> {
    let invalid = || AlphaZeroNetError::Game(format!("invalid coordinate '{}'", coordinate));

    let mut chars = coordinate.chars();
    let letter = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
    if !letter.is_ascii_uppercase() || letter == 'I' {
        return Err(invalid());
    }
    let col = (letter as u8 - b'A' - u8::from(letter > 'I')) as usize;
    let row = chars
        .as_str()
        .parse::<usize>()
        .ok()
        .and_then(|r| r.checked_sub(1))
        .ok_or_else(invalid)?;

    if row >= board_size || col >= board_size {
        return Err(invalid());
    }
    Ok(row * board_size + col)
}

#[derive(Debug, Clone)]
pub struct HavannahEnv {
    config: HavannahConfig,
    turn: Player,
    winner: Player,
    actions: Vec<HavannahAction>,
    board: Vec<Player>,
    legal_actions: Vec<bool>,
    inner_size: usize,
    empty_count: usize,
    // union-find over stones; roots carry the OR of corner/edge bits
    parents: Vec<usize>,
    patterns: Vec<u16>,
    ranks: Vec<u8>,
}

impl HavannahEnv {
    pub fn new(config: HavannahConfig) -> Result<Self> {
        if config.board_size % 2 == 0 || config.board_size > MAX_HAVANNAH_BOARD_SIZE {
            return Err(AlphaZeroNetError::Game(format!(
                "havannah board size must be odd and at most {}, got {}",
                MAX_HAVANNAH_BOARD_SIZE, config.board_size
            )));
        }

        let mut env = Self {
            config,
            turn: Player::Player1,
            winner: Player::None,
            actions: Vec::new(),
            board: Vec::new(),
            legal_actions: Vec::new(),
            inner_size: 0,
            empty_count: 0,
            parents: Vec::new(),
            patterns: Vec::new(),
            ranks: Vec::new(),
        };
        env.reset();
        Ok(env)
    }

    pub fn reset(&mut self) {
        let size = self.config.board_size;
        let cells = size * size;

        self.winner = Player::None;
        self.turn = Player::Player1;
        self.actions.clear();
        self.board = vec![Player::None; cells];
        self.inner_size = (size + 1) / 2;
        self.legal_actions = vec![false; cells];
        self.parents = (0..cells).collect();
        self.patterns = vec![0; cells];
        self.ranks = vec![0; cells];
        self.empty_count = 0;

        for i in 0..size {
            for j in 0..size {
                let pos = i * size + j;
                let on_board = self.is_on_board(i as isize, j as isize);
                self.legal_actions[pos] = on_board;
                self.empty_count += usize::from(on_board);
                self.patterns[pos] = self.pattern(i, j);
            }
        }
    }

    /// Play `action`; returns `false` and leaves the position untouched if it is illegal
    pub fn act(&mut self, action: HavannahAction) -> bool {
        if !self.is_legal_action(&action) {
            return false;
        }
        self.actions.push(action);

        let action_id = action.action_id();
        let swap_rule = self.config.use_swap_rule;

        if swap_rule && self.actions.len() == 2 && action_id == self.actions[0].action_id() {
            // second player takes over the opening stone
            self.board[action_id] = Player::None;
        }

        self.board[action_id] = action.player();
        self.legal_actions[action_id] = false;
        self.empty_count -= 1;

        if swap_rule && self.actions.len() <= 2 {
            if self.actions.len() == 1 {
                self.legal_actions[action_id] = true;
            } else {
                let first_action_id = self.actions[0].action_id();
                if first_action_id == action_id {
                    self.empty_count += 1;
                } else {
                    self.legal_actions[first_action_id] = false;
                }
            }
        }

        self.winner = self.update_winner(action_id);
        self.turn = action.next_player();

        true
    }

    /// Parse and play `[colour, coordinate]`
    pub fn act_str(&mut self, args: &[&str]) -> Result<bool> {
        let action = HavannahAction::from_string_args(args, self.config.board_size)?;
        Ok(self.act(action))
    }

    pub fn legal_actions(&self) -> Vec<HavannahAction> {
        (0..self.legal_actions.len())
            .map(|pos| HavannahAction::new(pos, self.turn))
            .filter(|action| self.is_legal_action(action))
            .collect()
    }

    /// Out-of-range ids and moves by the side not on turn are illegal
    pub fn is_legal_action(&self, action: &HavannahAction) -> bool {
        action.player() == self.turn
            && self
                .legal_actions
                .get(action.action_id())
                .copied()
                .unwrap_or(false)
    }

    pub fn is_terminal(&self) -> bool {
        self.winner != Player::None || self.empty_count == 0
    }

    pub fn reward(&self) -> f32 {
        0.0
    }

    /// Final score from the first player's point of view
    pub fn eval_score(&self, is_resign: bool) -> f32 {
        if is_resign {
            return if self.turn == Player::Player1 { -1.0 } else { 1.0 };
        }
        match self.winner {
            Player::Player1 => 1.0,
            Player::Player2 => -1.0,
            Player::None => 0.0,
        }
    }

    /// Channel-major input planes, `num_input_channels() × size × size`
    ///
    /// 0. stones of the side to move
    /// 1. stones of the opponent
    /// 2. all ones if black is to move
    /// 3. all ones if white is to move
    pub fn features(&self) -> Vec<f32> {
        let opponent = self.turn.next_player(HAVANNAH_NUM_PLAYER);
        let black_turn = if self.turn == Player::Player1 { 1.0 } else { 0.0 };
        let white_turn = if self.turn == Player::Player2 { 1.0 } else { 0.0 };

        let cells = self.board.len();
        let mut features = Vec::with_capacity(NUM_INPUT_CHANNELS * cells);
        features.extend(self.board.iter().map(|&p| if p == self.turn { 1.0 } else { 0.0 }));
        features.extend(self.board.iter().map(|&p| if p == opponent { 1.0 } else { 0.0 }));
        features.extend(std::iter::repeat(black_turn).take(cells));
        features.extend(std::iter::repeat(white_turn).take(cells));
        features
    }

    /// One-hot plane marking the cell `action` plays on
    pub fn action_features(&self, action: &HavannahAction) -> Vec<f32> {
        let mut features = vec![0.0; self.board.len()];
        if let Some(cell) = features.get_mut(action.action_id()) {
            *cell = 1.0;
        }
        features
    }

    pub fn num_input_channels(&self) -> usize {
        NUM_INPUT_CHANNELS
    }

    pub fn policy_size(&self) -> usize {
        self.config.board_size * self.config.board_size
    }

    pub fn name(&self) -> String {
        format!(
            "{}_{}x{}",
            HAVANNAH_NAME, self.config.board_size, self.config.board_size
        )
    }

    pub fn num_player(&self) -> usize {
        HAVANNAH_NUM_PLAYER
    }

    pub fn board_size(&self) -> usize {
        self.config.board_size
    }

    pub fn config(&self) -> &HavannahConfig {
        &self.config
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn winner(&self) -> Player {
        self.winner
    }

    pub fn board(&self) -> &[Player] {
        &self.board
    }

    pub fn actions(&self) -> &[HavannahAction] {
        &self.actions
    }

    /// Cells of the group that produced the win, in ascending order
    pub fn winning_stones(&self) -> Vec<usize> {
        let Some(last) = self.actions.last() else {
            return Vec::new();
        };
        if self.winner == Player::None {
            return Vec::new();
        }
        let group = self.root(last.action_id());
        (0..self.board.len())
            .filter(|&pos| self.board[pos] == self.winner && self.root(pos) == group)
            .collect()
    }

    /// Network shape matching this board: input planes and policy cover the full grid
    pub fn network_config(&self, num_hidden_channels: i64, num_blocks: i64) -> NetworkConfig {
        let size = self.config.board_size as i64;
        NetworkConfig::new(
            self.name(),
            NUM_INPUT_CHANNELS as i64,
            size,
            size,
            num_hidden_channels,
            size,
            size,
            num_blocks,
            1,
            self.policy_size() as i64,
        )
    }

    fn is_on_board(&self, i: isize, j: isize) -> bool {
        let size = self.config.board_size as isize;
        let inner = self.inner_size as isize;
        if i < 0 || i >= size || j < 0 || j >= size {
            return false;
        }
        let sum = i + j;
        inner - 1 <= sum && sum <= size * 2 - inner - 1
    }

    fn pattern(&self, i: usize, j: usize) -> u16 {
        let size = self.config.board_size;
        let inner = self.inner_size;

        // corners
        if i == 0 && j == inner - 1 {
            return 0x001;
        }
        if i == 0 && j == size - 1 {
            return 0x002;
        }
        if i == size - inner && j == size - 1 {
            return 0x004;
        }
        if i == size - 1 && j == size - inner {
            return 0x008;
        }
        if i == size - 1 && j == 0 {
            return 0x010;
        }
        if i == inner - 1 && j == 0 {
            return 0x020;
        }

        // edges
        if i + j == inner - 1 {
            return 0x040;
        }
        if i == 0 {
            return 0x080;
        }
        if j == size - 1 {
            return 0x100;
        }
        if i + j == size * 2 - inner - 1 {
            return 0x200;
        }
        if i == size - 1 {
            return 0x400;
        }
        if j == 0 {
            return 0x800;
        }

        0
    }

    fn neighbors(&self, pos: usize) -> Vec<usize> {
        let size = self.config.board_size;
        let (i, j) = ((pos / size) as isize, (pos % size) as isize);
        NEIGHBOR_OFFSETS
            .iter()
            .map(|&(di, dj)| (i + di, j + dj))
            .filter(|&(ni, nj)| self.is_on_board(ni, nj))
            .map(|(ni, nj)| ni as usize * size + nj as usize)
            .collect()
    }

    fn find(&mut self, x: usize) -> usize {
        let root = self.root(x);
        let mut cur = x;
        while self.parents[cur] != root {
            let next = self.parents[cur];
            self.parents[cur] = root;
            cur = next;
        }
        root
    }

    fn root(&self, mut x: usize) -> usize {
        while self.parents[x] != x {
            x = self.parents[x];
        }
        x
    }

    fn link(&mut self, x: usize, y: usize) {
        let mut px = self.find(x);
        let mut py = self.find(y);
        if px == py {
            return;
        }
        if self.ranks[px] < self.ranks[py] {
            std::mem::swap(&mut px, &mut py);
        } else if self.ranks[px] == self.ranks[py] {
            self.ranks[px] += 1;
        }
        self.parents[py] = px;
        self.patterns[px] |= self.patterns[py];

        let corners = (self.patterns[px] & CORNER_MASK).count_ones();
        let edges = (self.patterns[px] >> 6).count_ones();
        if corners >= 2 || edges >= 3 {
            self.winner = self.turn;
        }
    }

    fn update_winner(&mut self, action_id: usize) -> Player {
        for neighbor in self.neighbors(action_id) {
            if self.board[neighbor] == self.turn {
                self.link(action_id, neighbor);
            }
        }
        if self.has_ring(action_id) {
            self.winner = self.turn;
        }
        if self.winner != Player::None {
            log::debug!(
                "{} wins with {}",
                self.winner,
                action_id_to_coordinate(action_id, self.config.board_size)
            );
        }
        self.winner
    }

    /// Peel off group cells that cannot lie on a loop; a ring is what survives
    ///
    /// A cell is removable when it has fewer than two group neighbours, or
    /// exactly two that touch each other.
    fn has_ring(&self, action_id: usize) -> bool {
        let group = self.root(action_id);
        let cells = self.board.len();
        let size = self.config.board_size as isize;

        let mut connection = vec![false; cells];
        let mut num = 0;
        for (pos, connected) in connection.iter_mut().enumerate() {
            let on_board = self.is_on_board(pos as isize / size, pos as isize % size);
            if on_board && self.board[pos] != Player::None && self.root(pos) == group {
                *connected = true;
                num += 1;
            }
        }

        let group_neighbors = |pos: usize, connection: &[bool]| -> Vec<usize> {
            self.neighbors(pos)
                .into_iter()
                .filter(|&n| connection[n])
                .collect()
        };

        let mut checklist = VecDeque::new();
        let mut in_list = vec![false; cells];
        for pos in 0..cells {
            if !connection[pos] || group_neighbors(pos, &connection).len() >= 3 {
                continue;
            }
            checklist.push_back(pos);
            in_list[pos] = true;
        }

        while num >= MIN_RING_SIZE {
            let Some(target) = checklist.pop_front() else {
                break;
            };
            in_list[target] = false;

            let neighbors = group_neighbors(target, &connection);
            if neighbors.len() >= 3 {
                continue;
            }
            if neighbors.len() == 2 && !self.neighbors(neighbors[0]).contains(&neighbors[1]) {
                continue;
            }

            num -= 1;
            connection[target] = false;
            for neighbor in neighbors {
                if !in_list[neighbor] {
                    checklist.push_back(neighbor);
                    in_list[neighbor] = true;
                }
            }
        }

        num >= MIN_RING_SIZE
    }
}

impl std::fmt::Display for HavannahEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = self.config.board_size;
        let letters: String = (0..size).map(|j| format!(" {}", column_letter(j))).collect();

        // rows shift right by one column each, so the header lines up with the
        // first row and the footer with the last
        writeln!(f, "   {}", letters)?;
        for i in 0..size {
            write!(f, "{:>2} {}", i + 1, " ".repeat(i))?;
            for j in 0..size {
                let cell = match self.board[i * size + j] {
                    _ if !self.is_on_board(i as isize, j as isize) => ' ',
                    Player::Player1 => 'B',
                    Player::Player2 => 'W',
                    Player::None => '.',
                };
                write!(f, " {}", cell)?;
            }
            writeln!(f, " {}", i + 1)?;
        }
        writeln!(f, "   {}{}", " ".repeat(size - 1), letters)
    }
}
