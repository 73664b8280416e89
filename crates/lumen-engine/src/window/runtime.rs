use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::input::{
    InputEvent, InputFrame, InputState, Key, KeyState, Modifiers, MouseWheelDelta,
    PointerMoveEvent,
};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(420.0, 860.0),
        }
    }
}

/// Commands an app can issue from a frame; applied after the callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn create_window(&mut self, config: RuntimeConfig) {
        self.commands.push(Command::CreateWindow(config));
    }

    pub fn close_window(&mut self, id: WindowId) {
        self.commands.push(Command::CloseWindow(id));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    CreateWindow(RuntimeConfig),
    CloseWindow(WindowId),
    Exit,
}

/// Entry point for the event loop.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(initial: RuntimeConfig, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(initial, app);
        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;
        Ok(())
    }
}

struct WindowEntry {
    window: Arc<Window>,
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,
}

struct AppState<A: App + 'static> {
    initial: RuntimeConfig,
    app: A,
    windows: HashMap<WindowId, WindowEntry>,
    exit_requested: bool,
}

impl<A: App + 'static> AppState<A> {
    fn new(initial: RuntimeConfig, app: A) -> Self {
        Self { initial, app, windows: HashMap::new(), exit_requested: false }
    }

    fn create_window_entry(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: RuntimeConfig,
    ) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );
        let id = window.id();

        let control = self.app.on_window_created(&WindowCtx { id, window: &window });
        window.request_redraw();

        self.windows.insert(id, WindowEntry {
            window,
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
        });

        if control == AppControl::Exit {
            self.exit_requested = true;
        }
        Ok(id)
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::CreateWindow(cfg) => {
                    if let Err(e) = self.create_window_entry(event_loop, cfg) {
                        log::error!("failed to create window: {e:#}");
                        self.exit_requested = true;
                    }
                }
                Command::CloseWindow(id) => {
                    self.windows.remove(&id);
                }
                Command::Exit => self.exit_requested = true,
            }
        }

        if self.windows.is_empty() {
            self.exit_requested = true;
        }
        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn notify_resized(&mut self, window_id: WindowId) {
        if let Some(entry) = self.windows.get(&window_id) {
            self.app.on_resized(&WindowCtx { id: window_id, window: &entry.window });
            entry.window.request_redraw();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        let mut runtime_ctx = RuntimeCtx::default();

        let Some(entry) = self.windows.get_mut(&window_id) else {
            return;
        };
        let time = entry.clock.tick();
        let control = {
            let mut ctx = FrameCtx {
                window: WindowCtx { id: window_id, window: &entry.window },
                input: &entry.input_state,
                input_frame: &entry.input_frame,
                time,
                runtime: &mut runtime_ctx,
            };
            self.app.on_frame(&mut ctx)
        };
        entry.input_frame.clear();

        if control == AppControl::Exit {
            runtime_ctx.exit();
        }
        self.apply_commands(event_loop, runtime_ctx);
    }
}

impl<A: App + 'static> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }
        if let Err(e) = self.create_window_entry(event_loop, self.initial.clone()) {
            log::error!("failed to create initial window: {e:#}");
            self.exit_requested = true;
        }
        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // The scene animates every frame.
        event_loop.set_control_flow(ControlFlow::Wait);
        for entry in self.windows.values() {
            entry.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(entry) = self.windows.get_mut(&window_id) else {
            return;
        };
        if let Some(ev) = translate_input_event(&entry.window, &entry.input_state, &event) {
            entry.input_state.apply_event(&mut entry.input_frame, ev);
        }

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.windows.remove(&window_id);
                if self.windows.is_empty() {
                    self.exit_requested = true;
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.notify_resized(window_id);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop, window_id),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.app.on_exit();
        self.windows.clear();
        log::debug!("event loop exiting");
    }
}

fn translate_input_event(
    window: &Window,
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    match event {
        WindowEvent::ModifiersChanged(m) => {
            Some(InputEvent::ModifiersChanged(map_modifiers(m.state())))
        }
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),
        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),
        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(window, *position);
            Some(InputEvent::PointerMoved(PointerMoveEvent { x, y }))
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(p) => {
                    let (x, y) = to_logical_f32(window, *p);
                    MouseWheelDelta::Pixel { x, y }
                }
            };
            Some(InputEvent::MouseWheel { delta, modifiers: state.modifiers })
        }
        WindowEvent::KeyboardInput { event, .. } => Some(InputEvent::Key {
            key: map_key(event.physical_key),
            state: match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            },
            modifiers: state.modifiers,
            repeat: event.repeat,
        }),
        _ => None,
    }
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    (logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = pk else {
        return Key::Unknown(0);
    };
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Space => Key::Space,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        other => Key::Unknown(other as u32),
    }
}
