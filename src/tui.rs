use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Terminal;

use crate::difficulty::Difficulty;
use crate::engine::{Board, GameState};
use crate::events::VisualState;
use crate::game::Game;
use crate::geometry::Pos;
use crate::hud::Hud;

pub fn run_tui(difficulty: Difficulty, seed: u64) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let _guard = TermGuard;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut game = Game::new(difficulty, seed, Hud::new());
    let mut cursor = Pos::new(0, 0);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(250);

    let mut areas = Areas::default();
    let res = loop {
        terminal.draw(|f| { areas = ui(f, game.board(), game.presenter(), cursor); })?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if game.presenter().show_win_modal {
                        game.presenter_mut().dismiss_modal();
                        continue;
                    }
                    let board = game.board();
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break Ok(()),
                        KeyCode::Char('h') | KeyCode::Left => {
                            if cursor.col > 0 { cursor.col -= 1; }
                        }
                        KeyCode::Char('l') | KeyCode::Right => {
                            if cursor.col + 1 < board.cols() { cursor.col += 1; }
                        }
                        KeyCode::Char('k') | KeyCode::Up => {
                            if cursor.row > 0 { cursor.row -= 1; }
                        }
                        KeyCode::Char('j') | KeyCode::Down => {
                            if cursor.row + 1 < board.rows() { cursor.row += 1; }
                        }
                        KeyCode::Char('f') => { game.secondary_action(cursor).map_err(to_io)?; }
                        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') => {
                            game.primary_action(cursor).map_err(to_io)?;
                        }
                        KeyCode::Char('n') => {
                            let current = game.difficulty();
                            restart(&mut game, current, &mut cursor);
                        }
                        KeyCode::Char('1') => restart(&mut game, Difficulty::Easy, &mut cursor),
                        KeyCode::Char('2') => restart(&mut game, Difficulty::Medium, &mut cursor),
                        KeyCode::Char('3') => restart(&mut game, Difficulty::Hard, &mut cursor),
                        _ => {}
                    }
                }
                Event::Mouse(m) => {
                    if let MouseEventKind::Down(btn) = m.kind {
                        if game.presenter().show_win_modal {
                            game.presenter_mut().dismiss_modal();
                        } else if contains(areas.face, m.column, m.row) {
                            let current = game.difficulty();
                            restart(&mut game, current, &mut cursor);
                        } else if let Some(pos) = pos_to_cell(m.column, m.row, areas.board, game.board()) {
                            cursor = pos;
                            match btn {
                                MouseButton::Left => { game.primary_action(pos).map_err(to_io)?; }
                                MouseButton::Right => { game.secondary_action(pos).map_err(to_io)?; }
                                MouseButton::Middle => {}
                            }
                        }
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            // the clock is redrawn every frame; polling only keeps its schedule
            game.presenter_mut().timer.poll(last_tick);
        }
    };

    terminal.show_cursor()?;
    res
}

fn restart(game: &mut Game<Hud>, difficulty: Difficulty, cursor: &mut Pos) {
    game.restart(difficulty);
    let b = game.board();
    cursor.row = cursor.row.min(b.rows() - 1);
    cursor.col = cursor.col.min(b.cols() - 1);
}

fn to_io(e: crate::error::GameError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, e)
}

#[derive(Clone, Copy, Default)]
struct Areas {
    face: Rect,
    board: Rect,
}

fn ui(f: &mut ratatui::Frame, board: &Board, hud: &Hud, cursor: Pos) -> Areas {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.size());

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(8),
            Constraint::Min(10),
        ])
        .split(root[0]);

    let mines = Paragraph::new(format!("Mines {}  {}", hud.mine_counter(), hud.progress()))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Minesweeper"));
    f.render_widget(mines, header[0]);

    let face = Paragraph::new(hud.face.glyph())
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(face, header[1]);

    let clock = Paragraph::new(format!("Time {}", hud.clock(Instant::now())))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(clock, header[2]);

    let area = centered_grid_area(root[1], board.cols() as u16, board.rows() as u16);
    let inner = inner_area(area);
    draw_board(f, board, area, cursor);

    let status = match board.state() {
        GameState::Lost => "Boom! You hit a mine. n or click the face to restart, q to quit".to_string(),
        GameState::Won => "You won! n or click the face to restart, q to quit".to_string(),
        GameState::Playing => format!(
            "[{}] Mouse: left=reveal, right=flag • Arrows/HJKL move • Enter/Space reveal • f flag • 1/2/3 difficulty • n new • q quit",
            hud.difficulty
        ),
    };
    let footer = Paragraph::new(status)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, root[2]);

    if hud.show_win_modal {
        draw_win_modal(f, root[1], hud);
    }

    Areas { face: header[1], board: inner }
}

fn centered_grid_area(parent: Rect, cols: u16, rows: u16) -> Rect {
    let cell_w = 2; // one char + one space
    let grid_w = cols * cell_w + 2;
    let grid_h = rows + 2;
    let x = parent.x.saturating_add((parent.width.saturating_sub(grid_w)) / 2);
    let y = parent.y.saturating_add((parent.height.saturating_sub(grid_h)) / 2);
    Rect { x, y, width: grid_w.min(parent.width), height: grid_h.min(parent.height) }
}

fn draw_board(f: &mut ratatui::Frame, board: &Board, area: Rect, cursor: Pos) {
    let mut lines: Vec<Line> = Vec::with_capacity(board.rows());
    for row in 0..board.rows() {
        let mut spans: Vec<Span> = Vec::with_capacity(board.cols());
        for col in 0..board.cols() {
            let pos = Pos::new(row, col);
            let visual = board.cell(pos).map(|c| c.visual()).unwrap_or(VisualState::Hidden);
            let (mut ch, mut style) = glyph(visual);

            if cursor == pos {
                style = style.add_modifier(Modifier::REVERSED);
                if ch == ' ' { ch = '·'; }
            }

            spans.push(Span::styled(format!("{} ", ch), style));
        }
        lines.push(Line::from(spans));
    }

    let board_block = Block::default().borders(Borders::ALL).title("Board");
    let para = Paragraph::new(lines).block(board_block);
    f.render_widget(para, area);
}

fn glyph(visual: VisualState) -> (char, Style) {
    match visual {
        VisualState::Hidden => ('·', Style::default().fg(Color::DarkGray)),
        VisualState::Flagged => ('F', Style::default().fg(Color::Yellow)),
        VisualState::RevealedEmpty => (' ', Style::default().fg(Color::Gray)),
        VisualState::RevealedNumber(n) => (char::from(b'0' + n), number_style(n)),
        VisualState::RevealedMine => ('*', Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
    }
}

fn number_style(n: u8) -> Style {
    match n {
        1 => Style::default().fg(Color::Blue),
        2 => Style::default().fg(Color::Green),
        3 => Style::default().fg(Color::Red),
        4 => Style::default().fg(Color::Magenta),
        5 => Style::default().fg(Color::Yellow),
        6 => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::White),
    }
}

fn draw_win_modal(f: &mut ratatui::Frame, parent: Rect, hud: &Hud) {
    let width = 36.min(parent.width);
    let height = 5.min(parent.height);
    let area = Rect {
        x: parent.x + (parent.width - width) / 2,
        y: parent.y + (parent.height - height) / 2,
        width,
        height,
    };
    let text = vec![
        Line::from(format!("Cleared {} in {}s", hud.difficulty, hud.clock(Instant::now()))),
        Line::from(Span::styled("press any key", Style::default().fg(Color::DarkGray))),
    ];
    let modal = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL).title("You won!"));
    f.render_widget(Clear, area);
    f.render_widget(modal, area);
}

fn inner_area(area: Rect) -> Rect {
    // Match Block::inner() for Borders::ALL: shrink by 1 on each side
    Rect { x: area.x.saturating_add(1), y: area.y.saturating_add(1), width: area.width.saturating_sub(2), height: area.height.saturating_sub(2) }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

fn pos_to_cell(mx: u16, my: u16, inner: Rect, board: &Board) -> Option<Pos> {
    if !contains(inner, mx, my) { return None; }
    let cell_w = 2u16; // must match centered_grid_area and rendering width
    let col = ((mx - inner.x) / cell_w) as usize;
    let row = (my - inner.y) as usize;
    if row < board.rows() && col < board.cols() { Some(Pos::new(row, col)) } else { None }
}

struct TermGuard;
impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}
