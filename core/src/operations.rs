use rand::Rng;

use crate::constants::{FLAG_REGISTER, FONT_ADDR, FONT_HEIGHT, KEY_COUNT};
use crate::error::{Error, Result};
use crate::instruction::{Context, Status};
use crate::opcode::Opcode;

// None of these advance the program counter past the opcode itself; by the time
// an operation runs the driver has already moved PC to the next instruction.

/// Vx
fn vx(op: u16, cx: &Context) -> Result<u8> {
    cx.state.registers.v(op.x())
}

/// Vy
fn vy(op: u16, cx: &Context) -> Result<u8> {
    cx.state.registers.v(op.y())
}

/// Vx = value; VF = flag
/// The flag is written last so it wins when x is F.
fn set_with_flag(op: u16, cx: &mut Context, value: u8, flag: bool) -> Result<Status> {
    cx.state.registers.set_v(op.x(), value)?;
    cx.state.registers.set_v(FLAG_REGISTER, u8::from(flag))?;
    Ok(Status::Continue)
}

/// if condition then pc += 2
fn skip_if(cx: &mut Context, condition: bool) -> Result<Status> {
    if condition {
        cx.state.registers.pc = cx.state.registers.pc.wrapping_add(2);
    }
    Ok(Status::Continue)
}

/// Vx = value
fn set_vx(op: u16, cx: &mut Context, value: u8) -> Result<Status> {
    cx.state.registers.set_v(op.x(), value)?;
    Ok(Status::Continue)
}

/// clear
pub fn clr(_op: u16, cx: &mut Context) -> Result<Status> {
    cx.state.frame_buffer.clear();
    cx.state.draw_flag = true;
    Ok(Status::Continue)
}

/// PC = STACK.pop()
pub fn rts(_op: u16, cx: &mut Context) -> Result<Status> {
    cx.state.registers.pc = cx.state.stack.pop()?;
    Ok(Status::Continue)
}

/// PC = nnn
pub fn jump(op: u16, cx: &mut Context) -> Result<Status> {
    cx.state.registers.pc = op.nnn();
    Ok(Status::Continue)
}

/// STACK.push(PC); PC = nnn
pub fn call(op: u16, cx: &mut Context) -> Result<Status> {
    cx.state.stack.push(cx.state.registers.pc)?;
    cx.state.registers.pc = op.nnn();
    Ok(Status::Continue)
}

/// if Vx == kk then pc += 2
pub fn ske(op: u16, cx: &mut Context) -> Result<Status> {
    let condition = vx(op, cx)? == op.kk();
    skip_if(cx, condition)
}

/// if Vx != kk then pc += 2
pub fn skne(op: u16, cx: &mut Context) -> Result<Status> {
    let condition = vx(op, cx)? != op.kk();
    skip_if(cx, condition)
}

/// if Vx == Vy then pc += 2
pub fn skre(op: u16, cx: &mut Context) -> Result<Status> {
    let condition = vx(op, cx)? == vy(op, cx)?;
    skip_if(cx, condition)
}

/// Vx = kk
pub fn load(op: u16, cx: &mut Context) -> Result<Status> {
    set_vx(op, cx, op.kk())
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
pub fn add(op: u16, cx: &mut Context) -> Result<Status> {
    let value = vx(op, cx)?.wrapping_add(op.kk());
    set_vx(op, cx, value)
}

/// Vx = Vy
pub fn mv(op: u16, cx: &mut Context) -> Result<Status> {
    let value = vy(op, cx)?;
    set_vx(op, cx, value)
}

/// Vx |= Vy
pub fn or(op: u16, cx: &mut Context) -> Result<Status> {
    let value = vx(op, cx)? | vy(op, cx)?;
    set_vx(op, cx, value)
}

/// Vx &= Vy
pub fn and(op: u16, cx: &mut Context) -> Result<Status> {
    let value = vx(op, cx)? & vy(op, cx)?;
    set_vx(op, cx, value)
}

/// Vx ^= Vy
pub fn xor(op: u16, cx: &mut Context) -> Result<Status> {
    let value = vx(op, cx)? ^ vy(op, cx)?;
    set_vx(op, cx, value)
}

/// Vx += Vy; VF = carry
pub fn addr(op: u16, cx: &mut Context) -> Result<Status> {
    let (value, carry) = vx(op, cx)?.overflowing_add(vy(op, cx)?);
    set_with_flag(op, cx, value, carry)
}

/// Vx -= Vy; VF = !borrow
/// The flag compares the unsigned operands, Vx >= Vy.
pub fn sub(op: u16, cx: &mut Context) -> Result<Status> {
    let (x, y) = (vx(op, cx)?, vy(op, cx)?);
    set_with_flag(op, cx, x.wrapping_sub(y), x >= y)
}

/// Vx >>= 1; VF = bit shifted out
pub fn shr(op: u16, cx: &mut Context) -> Result<Status> {
    let x = vx(op, cx)?;
    set_with_flag(op, cx, x >> 1, x & 0x1 == 0x1)
}

/// Vx = Vy - Vx; VF = !borrow
pub fn subn(op: u16, cx: &mut Context) -> Result<Status> {
    let (x, y) = (vx(op, cx)?, vy(op, cx)?);
    set_with_flag(op, cx, y.wrapping_sub(x), y >= x)
}

/// Vx <<= 1; VF = bit shifted out
pub fn shl(op: u16, cx: &mut Context) -> Result<Status> {
    let x = vx(op, cx)?;
    set_with_flag(op, cx, x << 1, x & 0x80 == 0x80)
}

/// if Vx != Vy then pc += 2
pub fn skrne(op: u16, cx: &mut Context) -> Result<Status> {
    let condition = vx(op, cx)? != vy(op, cx)?;
    skip_if(cx, condition)
}

/// I = nnn
pub fn loadi(op: u16, cx: &mut Context) -> Result<Status> {
    cx.state.registers.i = op.nnn();
    Ok(Status::Continue)
}

/// PC = V0 + nnn
pub fn jumpi(op: u16, cx: &mut Context) -> Result<Status> {
    cx.state.registers.pc = op.nnn() + u16::from(cx.state.registers.v(0x0)?);
    Ok(Status::Continue)
}

/// Vx = rand_byte & kk
pub fn rnd(op: u16, cx: &mut Context) -> Result<Status> {
    let byte: u8 = cx.rng.gen();
    set_vx(op, cx, byte & op.kk())
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the sprite at mem[I..I+n] onto the frame buffer at Vx, Vy with wrapping.
/// VF = 1 if any pixels were erased
pub fn draw(op: u16, cx: &mut Context) -> Result<Status> {
    let (x, y) = (usize::from(vx(op, cx)?), usize::from(vy(op, cx)?));
    let sprite = cx
        .state
        .memory
        .slice(usize::from(cx.state.registers.i), usize::from(op.n()))?;
    let collision = cx.state.frame_buffer.draw_sprite(x, y, sprite);
    cx.state.registers.set_v(FLAG_REGISTER, u8::from(collision))?;
    cx.state.draw_flag = true;
    Ok(Status::Continue)
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: u16, cx: &mut Context) -> Result<Status> {
    let condition = cx.keyboard.is_down(vx(op, cx)?)?;
    skip_if(cx, condition)
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: u16, cx: &mut Context) -> Result<Status> {
    let condition = !cx.keyboard.is_down(vx(op, cx)?)?;
    skip_if(cx, condition)
}

/// Vx = DT
pub fn moved(op: u16, cx: &mut Context) -> Result<Status> {
    let value = cx.state.registers.delay_timer;
    set_vx(op, cx, value)
}

/// Vx = await keypress
pub fn keyd(op: u16, cx: &mut Context) -> Result<Status> {
    match cx.input.wait_for_key() {
        Some(key) if usize::from(key) < KEY_COUNT => set_vx(op, cx, key),
        Some(key) => Err(Error::InvalidKey(key)),
        None => Ok(Status::AwaitingKey),
    }
}

/// DT = Vx
pub fn loads(op: u16, cx: &mut Context) -> Result<Status> {
    cx.state.registers.delay_timer = vx(op, cx)?;
    Ok(Status::Continue)
}

/// ST = Vx
pub fn ld(op: u16, cx: &mut Context) -> Result<Status> {
    cx.state.registers.sound_timer = vx(op, cx)?;
    Ok(Status::Continue)
}

/// I += Vx
pub fn addi(op: u16, cx: &mut Context) -> Result<Status> {
    let x = u16::from(vx(op, cx)?);
    cx.state.registers.i = cx.state.registers.i.wrapping_add(x);
    Ok(Status::Continue)
}

/// I = Vx * 5
/// Set I to the address of the font glyph for the digit in Vx
pub fn ldspr(op: u16, cx: &mut Context) -> Result<Status> {
    cx.state.registers.i = FONT_ADDR + u16::from(vx(op, cx)?) * FONT_HEIGHT;
    Ok(Status::Continue)
}

/// mem[I..I+3] = bcd(Vx)
/// Store the hundreds, tens and units of Vx in memory starting at address I
pub fn bcd(op: u16, cx: &mut Context) -> Result<Status> {
    let x = vx(op, cx)?;
    let digits = [x / 100, x / 10 % 10, x % 10];
    cx.state
        .memory
        .write(usize::from(cx.state.registers.i), &digits)?;
    Ok(Status::Continue)
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: u16, cx: &mut Context) -> Result<Status> {
    let count = usize::from(op.x()) + 1;
    let registers = &cx.state.registers;
    cx.state
        .memory
        .write(usize::from(registers.i), &registers.v[..count])?;
    Ok(Status::Continue)
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: u16, cx: &mut Context) -> Result<Status> {
    let count = usize::from(op.x()) + 1;
    let bytes = cx
        .state
        .memory
        .slice(usize::from(cx.state.registers.i), count)?;
    cx.state.registers.v[..count].copy_from_slice(bytes);
    Ok(Status::Continue)
}
